//! Test utilities for mvn-classpath
//!
//! This module provides an in-memory [`ResolverService`] and logging setup for tests. It is
//! compiled for unit tests and, through the `test-utils` feature, for the integration
//! suite.
//!
//! # Mock Resolver
//!
//! [`MockResolver`] holds a small universe of artifacts and their dependencies. Collecting a
//! root walks that universe; resolving an artifact writes a placeholder file at its Maven
//! layout path under the session's local repository. The mock counts calls, records every
//! collect request, tracks how many collects overlap, and can be told to fail for given
//! coordinates at runtime.
//!
//! [`MockGraphBuilder`] hands a fixed [`DependencyGraph`] to a
//! [`GraphClasspath`](crate::graph_classpath::GraphClasspath), or fails when it has none.
//!
//! # Example
//!
//! ```rust,no_run
//! use mvn_classpath::test_utils::MockResolver;
//!
//! let service = MockResolver::new()
//!     .with_dependencies("junit:junit:4.10", &["org.hamcrest:hamcrest-core:1.1"]);
//! service.fail_on("junit:junit:4.10");
//! assert_eq!(service.collect_count(), 0);
//! ```

use crate::artifact::{Artifact, Dependency, Scope};
use crate::classpath::ProjectModel;
use crate::graph_classpath::DependencyGraphBuilder;
use crate::resolver::{
    ArtifactRequest, CollectRequest, DependencyGraph, DependencyNode, RepositorySession,
    ResolverService, TransferResource,
};
use anyhow::{Context, anyhow, bail};
use dashmap::DashSet;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Once, PoisonError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, logging stays off. Safe to
/// call from every test.
///
/// ```bash
/// RUST_LOG=mvn_classpath=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// `tracing` output captured by [`capture_logs`].
#[derive(Debug, Clone, Default)]
pub struct LogCapture(Arc<std::sync::Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        let buffer = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Capture this thread's events at `level` and above until the guard is dropped.
///
/// Only sees events emitted on the calling thread, which holds for `#[tokio::test]` on its
/// default current-thread runtime.
pub fn capture_logs(level: Level) -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    (capture, tracing::subscriber::set_default(subscriber))
}

#[derive(Debug, Clone)]
struct Edge {
    artifact: Artifact,
    scope: Scope,
    optional: bool,
}

/// An in-memory artifact universe standing in for a real resolver.
#[derive(Debug, Default)]
pub struct MockResolver {
    edges: HashMap<String, Vec<Edge>>,
    known: HashSet<String>,
    parents: HashMap<String, Artifact>,
    delay: Option<Duration>,
    failing: DashSet<String>,
    collects: AtomicUsize,
    resolves: AtomicUsize,
    active: AtomicUsize,
    peak: AtomicUsize,
    requests: Mutex<Vec<CollectRequest>>,
}

fn key(artifact: &Artifact) -> String {
    format!(
        "{}:{}:{}",
        artifact.group_id(),
        artifact.artifact_id(),
        artifact.version()
    )
}

fn parse(coords: &str) -> Artifact {
    coords
        .parse()
        .unwrap_or_else(|e| panic!("bad test coordinates '{coords}': {e}"))
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a leaf artifact that resolves but has no dependencies.
    #[must_use]
    pub fn with_artifact(mut self, coords: &str) -> Self {
        self.known.insert(key(&parse(coords)));
        self
    }

    /// Give `parent` compile-scope dependencies on `children`, in order.
    #[must_use]
    pub fn with_dependencies(mut self, parent: &str, children: &[&str]) -> Self {
        for child in children {
            self = self.with_dependency(parent, child, Scope::Compile);
        }
        self.with_artifact(parent)
    }

    #[must_use]
    pub fn with_dependency(self, parent: &str, child: &str, scope: Scope) -> Self {
        self.with_edge(parent, child, scope, false)
    }

    /// Give `parent` an optional compile-scope dependency on `child`.
    #[must_use]
    pub fn with_optional(self, parent: &str, child: &str) -> Self {
        self.with_edge(parent, child, Scope::Compile, true)
    }

    /// Declare `parent` as the parent POM of `child`.
    ///
    /// The POM is recognized by its file name, `artifactId-version.pom`.
    #[must_use]
    pub fn with_parent(mut self, child: &str, parent: &str) -> Self {
        let child = parse(child);
        let parent = parse(parent);
        self.known.insert(key(&parent));
        self.parents.insert(
            format!("{}-{}.pom", child.artifact_id(), child.version()),
            parent,
        );
        self
    }

    /// Hold every collect for `delay`, to make overlapping requests observable.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn with_edge(mut self, parent: &str, child: &str, scope: Scope, optional: bool) -> Self {
        let parent = parse(parent);
        let child = parse(child);
        self.known.insert(key(&parent));
        self.known.insert(key(&child));
        self.edges.entry(key(&parent)).or_default().push(Edge {
            artifact: child,
            scope,
            optional,
        });
        self
    }

    /// Fail every collect or resolve touching `coords` until [`recover`](Self::recover).
    pub fn fail_on(&self, coords: &str) {
        self.failing.insert(key(&parse(coords)));
    }

    pub fn recover(&self, coords: &str) {
        self.failing.remove(&key(&parse(coords)));
    }

    pub fn collect_count(&self) -> usize {
        self.collects.load(Ordering::SeqCst)
    }

    pub fn resolve_count(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }

    /// Highest number of collects that were in flight at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Every collect request received so far.
    pub async fn requests(&self) -> Vec<CollectRequest> {
        self.requests.lock().await.clone()
    }

    fn check(&self, artifact: &Artifact, repositories: &[String]) -> anyhow::Result<()> {
        let id = key(artifact);
        if self.failing.contains(&id) {
            bail!("Failed to transfer {artifact}: connection refused");
        }
        if !self.known.contains(&id) {
            bail!(
                "Could not find artifact {artifact} in [{}]",
                repositories.join(", ")
            );
        }
        Ok(())
    }

    fn node(
        &self,
        dependency: Dependency,
        repositories: &[String],
        path: &mut Vec<String>,
    ) -> anyhow::Result<DependencyNode> {
        self.check(&dependency.artifact, repositories)?;
        let id = key(&dependency.artifact);
        let mut node = DependencyNode::new(dependency);
        if path.contains(&id) {
            return Ok(node);
        }
        path.push(id.clone());
        for edge in self.edges.get(&id).into_iter().flatten() {
            let child = Dependency::new(edge.artifact.clone(), edge.scope).optional(edge.optional);
            node.children.push(self.node(child, repositories, path)?);
        }
        path.pop();
        Ok(node)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ResolverService for MockResolver {
    async fn collect_dependencies(
        &self,
        _session: &RepositorySession,
        request: &CollectRequest,
    ) -> anyhow::Result<DependencyGraph> {
        self.collects.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request.clone());

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        let _in_flight = InFlight(&self.active);
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let repositories: Vec<String> = request.repositories.iter().map(|r| r.id.clone()).collect();
        let root = self
            .node(request.root.clone(), &repositories, &mut Vec::new())
            .with_context(|| format!("Failed to collect dependencies at {}", request.root))?;
        Ok(DependencyGraph::new(root))
    }

    async fn resolve_artifact(
        &self,
        session: &RepositorySession,
        request: &ArtifactRequest,
    ) -> anyhow::Result<Artifact> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        let repositories: Vec<String> = request.repositories.iter().map(|r| r.id.clone()).collect();
        self.check(&request.artifact, &repositories)?;

        let manager = session.local_repository_manager();
        let path = manager.path_for(&request.artifact);
        let remote = request
            .repositories
            .first()
            .ok_or_else(|| anyhow!("No repositories to fetch {} from", request.artifact))?;
        let resource = TransferResource::new(
            remote.url.clone(),
            manager.relative_path(&request.artifact).display().to_string(),
        );

        let listener = session.transfer_listener();
        listener.transfer_started(&resource);
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let content = request.artifact.to_string();
        tokio::fs::write(&path, &content)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        listener.transfer_succeeded(&resource, content.len() as u64);

        Ok(request.artifact.clone().with_file(path))
    }

    async fn read_model_parent(&self, pom: &Path) -> anyhow::Result<Option<Artifact>> {
        let name = pom
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("Not a POM file: {}", pom.display()))?;
        Ok(self.parents.get(name).cloned())
    }
}

/// A graph builder returning a fixed graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockGraphBuilder {
    graph: Option<DependencyGraph>,
}

impl MockGraphBuilder {
    pub fn new(graph: DependencyGraph) -> Self {
        Self { graph: Some(graph) }
    }

    /// A builder whose every build fails.
    pub fn failing() -> Self {
        Self::default()
    }
}

impl DependencyGraphBuilder for MockGraphBuilder {
    async fn build_dependency_graph(
        &self,
        _project: &ProjectModel,
        _scopes: &[Scope],
    ) -> anyhow::Result<DependencyGraph> {
        self.graph
            .clone()
            .ok_or_else(|| anyhow!("Could not resolve dependencies of the project"))
    }
}
