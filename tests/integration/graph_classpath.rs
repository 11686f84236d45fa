//! Classpath built from a prebuilt dependency graph.

use crate::common::{JUNIT, dependency, file_names, project, validator_without_oro};
use anyhow::Result;
use mvn_classpath::artifact::{Dependency, Scope};
use mvn_classpath::core::ResolveError;
use mvn_classpath::graph_classpath::GraphClasspath;
use mvn_classpath::resolver::{DependencyGraph, DependencyNode};
use mvn_classpath::test_utils::MockGraphBuilder;
use std::path::PathBuf;
use tempfile::TempDir;

fn node(coords: &str, scope: Scope) -> DependencyNode {
    DependencyNode::new(Dependency::new(coords.parse().unwrap(), scope))
}

/// A project depending on junit for tests and on commons-validator without oro.
fn graph(output: &std::path::Path) -> DependencyGraph {
    let app = Dependency::new("com.example:app:1.0".parse().unwrap(), Scope::Compile);
    let app = DependencyNode::new(Dependency {
        artifact: app.artifact.with_file(output),
        ..app
    });
    DependencyGraph::new(
        app.with_child(
            node(JUNIT, Scope::Test).with_child(node("org.hamcrest:hamcrest-core:1.1", Scope::Test)),
        )
        .with_child(
            node("commons-validator:commons-validator:1.3.1", Scope::Compile)
                .with_child(node("commons-beanutils:commons-beanutils:1.7.0", Scope::Compile))
                .with_child(node("oro:oro:2.0.8", Scope::Compile)),
        ),
    )
}

#[tokio::test]
async fn test_builds_classpath_from_graph() -> Result<()> {
    let temp = TempDir::new()?;
    let output = temp.path().join("target/classes");
    let project = project(vec![dependency(JUNIT, Scope::Test)]);
    let classpath = GraphClasspath::new(
        MockGraphBuilder::new(graph(&output)),
        project,
        temp.path().join("repo"),
        &["test"],
    )?;

    let files = classpath.files().await?;
    assert_eq!(files[0], PathBuf::from("/some/path/as/directory"));
    assert_eq!(files[1], output);
    assert_eq!(
        files[2],
        temp.path().join("repo/junit/junit/4.10/junit-4.10.jar")
    );
    let names = file_names(&files);
    assert!(names.contains(&"hamcrest-core-1.1.jar".to_string()));
    assert!(!names.contains(&"commons-validator-1.3.1.jar".to_string()));
    assert_eq!(classpath.len().await?, 4);
    Ok(())
}

#[tokio::test]
async fn test_graph_render_lists_roots() -> Result<()> {
    let temp = TempDir::new()?;
    let project = project(vec![validator_without_oro(), dependency(JUNIT, Scope::Test)]);
    let classpath = GraphClasspath::new(
        MockGraphBuilder::new(graph(temp.path())),
        project,
        temp.path(),
        &["compile"],
    )?;

    let text = classpath.render().await;
    assert!(text.starts_with("commons-validator:commons-validator:1.3.1:1\n"));
    assert!(text.contains("\n  oro:oro:jar:2.0.8 (excluded)"));
    assert!(!text.contains("junit"));

    let roots = classpath.roots().await?;
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].children().len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_graph_render_with_broken_dependency() -> Result<()> {
    let temp = TempDir::new()?;
    let project = project(vec![dependency("junit-broken:junit-absent:1.0", Scope::Test)]);

    let failing = GraphClasspath::new(MockGraphBuilder::failing(), project.clone(), temp.path(), &["test"])?;
    let text = failing.render().await;
    assert!(text.starts_with("failed to load 'junit-broken:junit-absent:jar:1.0 (test)' "));
    assert!(text.contains("Could not resolve dependencies of the project"));
    let err = failing.files().await.unwrap_err();
    assert!(matches!(err, ResolveError::GraphBuildFailure { .. }));

    let missing = GraphClasspath::new(
        MockGraphBuilder::new(graph(temp.path())),
        project,
        temp.path(),
        &["test"],
    )?;
    let text = missing.render().await;
    assert!(text.starts_with("failed to load 'junit-broken:junit-absent:jar:1.0 (test)' "));
    assert!(text.contains("is not in the dependency graph"));
    assert!(missing.roots().await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_graph_classpath_equality() -> Result<()> {
    let temp = TempDir::new()?;
    let project = project(vec![dependency("org.apache.commons:commons-lang3-absent:3.0", Scope::Compile)]);
    let build = |scopes: &[&str]| {
        GraphClasspath::new(MockGraphBuilder::failing(), project.clone(), temp.path(), scopes)
    };

    let classpath = build(&["test", "compile"])?;
    assert_eq!(classpath, classpath);
    assert_eq!(classpath, build(&["compile", "test"])?);
    assert_ne!(classpath, build(&["test"])?);
    assert_ne!(
        classpath,
        GraphClasspath::new(
            MockGraphBuilder::new(graph(temp.path())),
            project.clone(),
            temp.path(),
            &["test", "compile"],
        )?
    );
    Ok(())
}

#[tokio::test]
async fn test_graph_unknown_scope_is_configuration_error() -> Result<()> {
    let temp = TempDir::new()?;
    let err = GraphClasspath::new(MockGraphBuilder::failing(), project(vec![]), temp.path(), &["tests"])
        .unwrap_err();
    assert!(matches!(err, ResolveError::ConfigurationError { .. }));
    Ok(())
}
