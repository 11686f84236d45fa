//! Classpath over a dependency graph the build tool has already resolved.
//!
//! [`Classpath`](crate::classpath::Classpath) asks a resolver for every root. A
//! [`GraphClasspath`] does not: a [`DependencyGraphBuilder`] hands over the project's graph,
//! whose root node stands for the project itself, and the artifacts in it are located in
//! the local repository.
//!
//! # Walk
//!
//! ```text
//! project node             always kept, contributes its own file if bound
//!   └─ child in scopes     kept, file from the node or the local repository layout
//!        └─ ...            children equal to their parent are skipped
//!   └─ child not in scopes dropped together with its subtree
//! ```
//!
//! The graph is rebuilt on every call; the builder owns any caching.

use crate::artifact::{Artifact, Dependency, Exclusion, Scope};
use crate::classpath::ProjectModel;
use crate::core::{ResolveError, Result};
use crate::resolver::{DependencyGraph, DependencyNode, LocalRepository, LocalRepositoryManager};
use anyhow::anyhow;
use indexmap::IndexSet;
use std::fmt::Write as _;
use std::future::Future;
use std::path::PathBuf;

/// Source of a project's resolved dependency graph, typically the build tool itself.
pub trait DependencyGraphBuilder: Send + Sync {
    /// Build the graph of `project`.
    ///
    /// The root node represents the project. Nodes outside `scopes` may be left out.
    fn build_dependency_graph(
        &self,
        project: &ProjectModel,
        scopes: &[Scope],
    ) -> impl Future<Output = anyhow::Result<DependencyGraph>> + Send;
}

fn same_artifact(a: &Artifact, b: &Artifact) -> bool {
    a.coordinate() == b.coordinate() && a.version() == b.version()
}

/// A declared dependency with children taken from a prebuilt graph.
#[derive(Debug, Clone)]
pub struct GraphRootArtifact {
    artifact: Artifact,
    exclusions: Vec<Exclusion>,
    children: Vec<Artifact>,
}

impl GraphRootArtifact {
    pub fn new(artifact: Artifact, exclusions: Vec<Exclusion>, children: Vec<Artifact>) -> Self {
        Self {
            artifact,
            exclusions,
            children,
        }
    }

    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    pub fn children(&self) -> &[Artifact] {
        &self.children
    }

    pub fn excluded(&self, artifact: &Artifact) -> bool {
        self.exclusions.iter().any(|exclusion| exclusion.matches(artifact))
    }

    /// Same layout as [`RootArtifact::render`](crate::root::RootArtifact::render).
    pub fn render(&self) -> String {
        let mut text = format!(
            "{}:{}:{}:{}",
            self.artifact.group_id(),
            self.artifact.artifact_id(),
            self.artifact.version(),
            self.exclusions.len()
        );
        for child in &self.children {
            let _ = write!(text, "\n  {child}");
            if self.excluded(child) {
                text.push_str(" (excluded)");
            }
        }
        text
    }
}

/// Identity is the artifact and its exclusions; children follow from the graph.
impl PartialEq for GraphRootArtifact {
    fn eq(&self, other: &Self) -> bool {
        self.artifact == other.artifact && self.exclusions == other.exclusions
    }
}

impl Eq for GraphRootArtifact {}

/// The classpath of a project in a set of scopes, read from its dependency graph.
#[derive(Debug)]
pub struct GraphClasspath<B> {
    builder: B,
    project: ProjectModel,
    local: LocalRepositoryManager,
    scopes: IndexSet<Scope>,
}

impl<B: DependencyGraphBuilder> GraphClasspath<B> {
    /// # Errors
    ///
    /// [`ResolveError::ConfigurationError`] for an unknown scope name,
    /// [`ResolveError::InvalidArgument`] for an empty local repository path.
    pub fn new(
        builder: B,
        project: ProjectModel,
        local_repository: impl Into<PathBuf>,
        scopes: &[&str],
    ) -> Result<Self> {
        let local_repository = local_repository.into();
        if local_repository.as_os_str().is_empty() {
            return Err(ResolveError::invalid_argument(
                "local_repository",
                "local repository path must not be empty",
            ));
        }
        let scopes = scopes
            .iter()
            .map(|name| name.parse::<Scope>())
            .collect::<Result<IndexSet<_>>>()?;
        Ok(Self {
            builder,
            project,
            local: LocalRepositoryManager::new(LocalRepository::new(local_repository)),
            scopes,
        })
    }

    pub fn scopes(&self) -> impl Iterator<Item = Scope> + '_ {
        self.scopes.iter().copied()
    }

    async fn graph(&self) -> Result<DependencyGraph> {
        let scopes: Vec<Scope> = self.scopes().collect();
        self.builder
            .build_dependency_graph(&self.project, &scopes)
            .await
            .map_err(|source| ResolveError::GraphBuildFailure { source })
    }

    /// Project elements for the scopes, then every file reachable in the graph.
    pub async fn files(&self) -> Result<Vec<PathBuf>> {
        let scopes: Vec<Scope> = self.scopes().collect();
        let mut files: IndexSet<PathBuf> =
            self.project.classpath_elements(&scopes).into_iter().collect();
        let graph = self.graph().await?;
        if let Some(file) = graph.root.artifact().file() {
            files.insert(file.to_path_buf());
        }
        for child in &graph.root.children {
            self.collect_files(child, &graph.root, &mut files);
        }
        Ok(files.into_iter().collect())
    }

    fn collect_files(
        &self,
        node: &DependencyNode,
        parent: &DependencyNode,
        files: &mut IndexSet<PathBuf>,
    ) {
        if same_artifact(node.artifact(), parent.artifact())
            || !self.scopes.contains(&node.dependency.scope)
        {
            return;
        }
        let artifact = node.artifact();
        files.insert(
            artifact
                .file()
                .map_or_else(|| self.local.path_for(artifact), |f| f.to_path_buf()),
        );
        for child in &node.children {
            self.collect_files(child, node, files);
        }
    }

    pub async fn len(&self) -> Result<usize> {
        Ok(self.files().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.files().await?.is_empty())
    }

    /// One root per declared dependency in the requested scopes.
    pub async fn roots(&self) -> Result<Vec<GraphRootArtifact>> {
        let graph = self.graph().await?;
        self.declared()
            .map(|dependency| root_in(&graph, dependency))
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|source| ResolveError::GraphBuildFailure { source })
    }

    fn declared(&self) -> impl Iterator<Item = &Dependency> + '_ {
        self.project
            .dependencies
            .iter()
            .filter(|dependency| self.scopes.contains(&dependency.scope))
    }

    /// One block per root; a root that cannot be built renders as a `failed to load` line.
    pub async fn render(&self) -> String {
        let graph = self.graph().await;
        let mut lines = Vec::new();
        for dependency in self.declared() {
            let root = match &graph {
                Ok(graph) => root_in(graph, dependency).map_err(|e| format!("{e:#}")),
                Err(e) => Err(e.to_string()),
            };
            match root {
                Ok(root) => lines.push(root.render()),
                Err(cause) => lines.push(format!("failed to load '{dependency}' {cause}")),
            }
        }
        lines.join("\n")
    }
}

/// The declared `dependency` with its subtree from `graph`, in preorder.
fn root_in(graph: &DependencyGraph, dependency: &Dependency) -> anyhow::Result<GraphRootArtifact> {
    let node = graph
        .root
        .children
        .iter()
        .find(|node| node.artifact().coordinate() == dependency.artifact.coordinate())
        .ok_or_else(|| anyhow!("{} is not in the dependency graph", dependency.artifact))?;

    fn walk(node: &DependencyNode, children: &mut Vec<Artifact>) {
        children.push(node.artifact().clone());
        for child in &node.children {
            if !same_artifact(child.artifact(), node.artifact()) {
                walk(child, children);
            }
        }
    }
    let mut children = Vec::new();
    walk(node, &mut children);

    Ok(GraphRootArtifact::new(
        dependency.artifact.clone(),
        dependency.exclusions.clone(),
        children,
    ))
}

/// Equal when built by equal builders for the same project and scopes, in any order.
impl<B: PartialEq> PartialEq for GraphClasspath<B> {
    fn eq(&self, other: &Self) -> bool {
        self.builder == other.builder
            && self.project == other.project
            && self.scopes == other.scopes
    }
}

impl<B: Eq> Eq for GraphClasspath<B> {}
