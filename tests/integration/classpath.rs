//! Classpath reconciliation against the mock resolver.

use crate::common::{
    JUNIT, VALIDATOR, dependency, file_names, project, universe, validator_without_oro,
};
use anyhow::Result;
use mvn_classpath::artifact::Scope;
use mvn_classpath::classpath::{Classpath, ProjectModel};
use mvn_classpath::config::ResolverSettings;
use mvn_classpath::core::ResolveError;
use mvn_classpath::resolver::Aether;
use mvn_classpath::test_utils::MockResolver;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

fn classpath(
    service: &Arc<MockResolver>,
    local: &TempDir,
    project: &ProjectModel,
    scopes: &[&str],
) -> Result<Classpath<MockResolver>> {
    let aether = Aether::for_project(
        service.clone(),
        project,
        local.path(),
        &ResolverSettings::default(),
    )?;
    Ok(Classpath::new(aether, project, scopes)?)
}

#[tokio::test]
async fn test_builds_test_classpath() -> Result<()> {
    let temp = TempDir::new()?;
    let service = Arc::new(universe());
    let project = project(vec![dependency(JUNIT, Scope::Test)]);
    let classpath = classpath(&service, &temp, &project, &["test"])?;

    let files = classpath.files().await?;
    assert_eq!(files[0], PathBuf::from("/some/path/as/directory"));
    assert!(files[0].ends_with("as/directory"));
    let names = file_names(&files);
    assert!(names.contains(&"junit-4.10.jar".to_string()));
    assert!(names.contains(&"hamcrest-core-1.1.jar".to_string()));
    assert!(files.iter().skip(1).all(|f| f.starts_with(temp.path()) && f.exists()));
    assert_eq!(classpath.len().await?, 3);
    Ok(())
}

#[tokio::test]
async fn test_compile_scope_skips_test_elements_and_dependencies() -> Result<()> {
    let temp = TempDir::new()?;
    let service = Arc::new(universe());
    let mut project = project(vec![dependency(JUNIT, Scope::Test)]);
    project.compile_classpath_elements = vec!["/project/target/classes".into()];
    let classpath = classpath(&service, &temp, &project, &["compile"])?;

    let files = classpath.files().await?;
    assert_eq!(files, vec![PathBuf::from("/project/target/classes")]);
    assert_eq!(service.collect_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_elements_seeded_per_scope() -> Result<()> {
    let temp = TempDir::new()?;
    let service = Arc::new(universe());
    let project = ProjectModel {
        compile_classpath_elements: vec!["/c".into(), "/shared".into()],
        runtime_classpath_elements: vec!["/r".into()],
        test_classpath_elements: vec!["/t".into(), "/shared".into()],
        system_classpath_elements: vec!["/s".into()],
        ..ProjectModel::default()
    };

    let all = classpath(&service, &temp, &project, &["compile", "runtime", "test", "system"])?;
    assert_eq!(
        all.files().await?,
        ["/t", "/shared", "/r", "/s", "/c"].map(PathBuf::from).to_vec()
    );

    let provided = classpath(&service, &temp, &project, &["provided"])?;
    assert_eq!(provided.files().await?, ["/c", "/shared"].map(PathBuf::from).to_vec());
    assert!(!provided.is_empty().await?);
    Ok(())
}

#[tokio::test]
async fn test_highest_version_wins() -> Result<()> {
    let temp = TempDir::new()?;
    let service = Arc::new(universe());
    let project = project(vec![
        dependency(JUNIT, Scope::Test),
        dependency("junit:junit:4.8", Scope::Test),
        dependency("junit:junit:4.8.2", Scope::Test),
    ]);
    let classpath = classpath(&service, &temp, &project, &["test"])?;

    let names = file_names(&classpath.files().await?);
    assert_eq!(names, vec!["directory", "junit-4.10.jar", "hamcrest-core-1.1.jar"]);

    let junit: Vec<_> = classpath
        .artifacts()
        .await?
        .into_iter()
        .filter(|a| a.artifact_id() == "junit")
        .collect();
    assert_eq!(junit.len(), 1);
    assert_eq!(junit[0].version(), "4.10");
    Ok(())
}

#[tokio::test]
async fn test_newer_version_replaces_in_place() -> Result<()> {
    let temp = TempDir::new()?;
    let service = Arc::new(universe());
    let project = project(vec![
        dependency("junit:junit:4.8", Scope::Test),
        dependency("junit:junit:4.8.2", Scope::Test),
        dependency(JUNIT, Scope::Test),
    ]);
    let classpath = classpath(&service, &temp, &project, &["test"])?;

    let names = file_names(&classpath.files().await?);
    assert_eq!(names, vec!["directory", "junit-4.10.jar", "hamcrest-core-1.1.jar"]);
    Ok(())
}

#[tokio::test]
async fn test_prerelease_conflict_picks_higher_qualifier() -> Result<()> {
    let temp = TempDir::new()?;
    let service = Arc::new(
        MockResolver::new()
            .with_dependencies("com.example:app-a:1.0", &["com.example:core:2.0.0-alpha1"])
            .with_dependencies("com.example:app-b:1.0", &["com.example:core:2.0-beta1"]),
    );
    let project = project(vec![
        dependency("com.example:app-a:1.0", Scope::Compile),
        dependency("com.example:app-b:1.0", Scope::Compile),
    ]);
    let classpath = classpath(&service, &temp, &project, &["compile"])?;

    let names = file_names(&classpath.files().await?);
    assert_eq!(names, vec!["app-a-1.0.jar", "core-2.0-beta1.jar", "app-b-1.0.jar"]);
    Ok(())
}

#[tokio::test]
async fn test_transitive_conflict_keeps_first_slot() -> Result<()> {
    let temp = TempDir::new()?;
    let service = Arc::new(universe());
    let project = project(vec![dependency(VALIDATOR, Scope::Compile)]);
    let classpath = classpath(&service, &temp, &project, &["compile"])?;

    let ids: Vec<String> = classpath
        .artifacts()
        .await?
        .iter()
        .map(|a| format!("{}:{}", a.artifact_id(), a.version()))
        .collect();
    assert_eq!(
        ids,
        vec![
            "commons-validator:1.3.1",
            "commons-beanutils:1.7.0",
            "commons-digester:1.6",
            "commons-logging:1.1",
            "oro:2.0.8",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_exclusions_and_optionals_are_dropped() -> Result<()> {
    let temp = TempDir::new()?;
    let service = Arc::new(universe());
    let project = project(vec![validator_without_oro()]);
    let classpath = classpath(&service, &temp, &project, &["compile"])?;

    let names = file_names(&classpath.files().await?);
    assert!(!names.contains(&"oro-2.0.8.jar".to_string()));
    assert!(!names.contains(&"xml-apis-2.0.2.jar".to_string()));
    assert!(names.contains(&"commons-beanutils-1.7.0.jar".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_results_are_deterministic() -> Result<()> {
    let service = Arc::new(universe());
    let project = project(vec![
        dependency(VALIDATOR, Scope::Compile),
        dependency(JUNIT, Scope::Test),
    ]);

    let temp = TempDir::new()?;
    let first = classpath(&service, &temp, &project, &["test", "compile"])?;
    let second = classpath(&service, &temp, &project, &["test", "compile"])?;
    assert_eq!(first.files().await?, second.files().await?);
    assert_eq!(first.files().await?, first.files().await?);
    Ok(())
}

#[tokio::test]
async fn test_roots_are_resolved_once_per_classpath() -> Result<()> {
    let temp = TempDir::new()?;
    let service = Arc::new(universe());
    let project = project(vec![dependency(JUNIT, Scope::Test)]);
    let classpath = classpath(&service, &temp, &project, &["test"])?;

    classpath.files().await?;
    classpath.len().await?;
    classpath.render().await;
    assert_eq!(service.collect_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_broken_dependency_is_rendered_inline() -> Result<()> {
    let temp = TempDir::new()?;
    let service = Arc::new(universe());
    let project = project(vec![
        dependency(JUNIT, Scope::Test),
        dependency("junit-broken:junit-absent:1.0", Scope::Test),
    ]);
    let classpath = classpath(&service, &temp, &project, &["test"])?;

    let text = classpath.render().await;
    assert!(text.starts_with("junit:junit:4.10:0\n  junit:junit:jar:4.10"));
    assert!(text.contains("failed to load 'junit-broken:junit-absent:jar:1.0 (test)'"));

    let err = classpath.files().await.unwrap_err();
    assert!(matches!(err, ResolveError::DependencyResolutionFailure { .. }));
    Ok(())
}

#[tokio::test]
async fn test_render_lists_children_and_exclusions() -> Result<()> {
    let temp = TempDir::new()?;
    let service = Arc::new(universe());
    let project = project(vec![validator_without_oro()]);
    let classpath = classpath(&service, &temp, &project, &["compile"])?;

    let text = classpath.render().await;
    assert!(text.starts_with("commons-validator:commons-validator:1.3.1:1\n"));
    assert!(text.contains("\n  oro:oro:jar:2.0.8 (excluded)"));
    assert!(text.contains("\n  commons-beanutils:commons-beanutils:jar:1.7.0\n"));
    assert!(!text.contains("xml-apis"));
    Ok(())
}

#[tokio::test]
async fn test_unknown_scope_is_configuration_error() -> Result<()> {
    let temp = TempDir::new()?;
    let service = Arc::new(universe());
    let project = project(vec![dependency(JUNIT, Scope::Test)]);
    let err = classpath(&service, &temp, &project, &["tests"])
        .unwrap_err()
        .downcast::<ResolveError>()?;
    assert!(matches!(err, ResolveError::ConfigurationError { .. }));
    Ok(())
}
