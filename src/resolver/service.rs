//! The seam to the underlying artifact resolution engine.
//!
//! Graph construction, downloads and local caching are not done by this crate. They sit
//! behind [`ResolverService`], which the facade drives with one [`RepositorySession`] per
//! request. Implementations report failures as [`anyhow::Error`]; the facade wraps them
//! with the request context.

use super::graph::{DependencyFilter, DependencyGraph};
use crate::artifact::{Artifact, Dependency};
use crate::core::{ResolveError, Result};
use crate::repository::RemoteRepository;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A local repository directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalRepository {
    basedir: PathBuf,
}

impl LocalRepository {
    pub fn new(basedir: impl Into<PathBuf>) -> Self {
        Self {
            basedir: basedir.into(),
        }
    }

    pub fn basedir(&self) -> &Path {
        &self.basedir
    }
}

/// Maps artifacts onto paths inside a local repository using the default Maven layout:
/// `group/as/dirs/artifactId/version/artifactId-version[-classifier].extension`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRepositoryManager {
    repository: LocalRepository,
}

impl LocalRepositoryManager {
    pub fn new(repository: LocalRepository) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &LocalRepository {
        &self.repository
    }

    /// Path of `artifact` relative to the repository base directory.
    pub fn relative_path(&self, artifact: &Artifact) -> PathBuf {
        let mut path: PathBuf = artifact.group_id().split('.').collect();
        path.push(artifact.artifact_id());
        path.push(artifact.version());

        let mut name = format!("{}-{}", artifact.artifact_id(), artifact.version());
        if !artifact.classifier().is_empty() {
            name.push('-');
            name.push_str(artifact.classifier());
        }
        name.push('.');
        name.push_str(artifact.extension());
        path.push(name);
        path
    }

    /// Absolute path of `artifact` in this repository.
    pub fn path_for(&self, artifact: &Artifact) -> PathBuf {
        self.repository.basedir.join(self.relative_path(artifact))
    }
}

/// A single file moving between a remote repository and the local one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResource {
    pub repository_url: String,
    pub resource_name: String,
    pub file: Option<PathBuf>,
}

impl TransferResource {
    pub fn new(repository_url: impl Into<String>, resource_name: impl Into<String>) -> Self {
        Self {
            repository_url: repository_url.into(),
            resource_name: resource_name.into(),
            file: None,
        }
    }
}

/// Receives transfer progress from a resolver service.
pub trait TransferListener: Send + Sync {
    fn transfer_started(&self, _resource: &TransferResource) {}

    fn transfer_succeeded(&self, _resource: &TransferResource, _bytes: u64) {}

    fn transfer_failed(&self, _resource: &TransferResource, _error: &anyhow::Error) {}
}

/// Reports transfers through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransferListener;

impl TransferListener for LogTransferListener {
    fn transfer_started(&self, resource: &TransferResource) {
        tracing::debug!(
            "Downloading {}{}",
            resource.repository_url,
            resource.resource_name
        );
    }

    fn transfer_succeeded(&self, resource: &TransferResource, bytes: u64) {
        tracing::info!(
            "Downloaded {}{} ({} bytes)",
            resource.repository_url,
            resource.resource_name,
            bytes
        );
    }

    fn transfer_failed(&self, resource: &TransferResource, error: &anyhow::Error) {
        tracing::warn!(
            "Failed to download {}{}: {}",
            resource.repository_url,
            resource.resource_name,
            error
        );
    }
}

/// Per-request state handed to every service call.
#[derive(Clone)]
pub struct RepositorySession {
    local: LocalRepositoryManager,
    listener: Arc<dyn TransferListener>,
}

impl RepositorySession {
    pub fn new(local: LocalRepositoryManager, listener: Arc<dyn TransferListener>) -> Self {
        Self { local, listener }
    }

    pub fn local_repository_manager(&self) -> &LocalRepositoryManager {
        &self.local
    }

    pub fn transfer_listener(&self) -> &dyn TransferListener {
        self.listener.as_ref()
    }
}

impl std::fmt::Debug for RepositorySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositorySession")
            .field("local", &self.local)
            .finish_non_exhaustive()
    }
}

/// Request to build the dependency graph below `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectRequest {
    pub root: Dependency,
    pub repositories: Vec<RemoteRepository>,
}

/// Request to fetch one artifact into the local repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRequest {
    pub artifact: Artifact,
    pub repositories: Vec<RemoteRepository>,
}

impl ArtifactRequest {
    pub fn new(artifact: Artifact, repositories: Vec<RemoteRepository>) -> Self {
        Self {
            artifact,
            repositories,
        }
    }
}

/// The artifact resolution engine.
///
/// Implementations must be usable from several tasks at once; the facade serializes calls
/// that share a local repository, not the service itself.
pub trait ResolverService: Send + Sync {
    /// Manager for `repository`, using the default layout unless overridden.
    fn new_local_repository_manager(
        &self,
        repository: &LocalRepository,
    ) -> Result<LocalRepositoryManager> {
        if repository.basedir().as_os_str().is_empty() {
            return Err(ResolveError::invalid_argument(
                "local_repository",
                "local repository path must not be empty",
            ));
        }
        Ok(LocalRepositoryManager::new(repository.clone()))
    }

    /// Build the transitive dependency graph of `request.root`.
    fn collect_dependencies(
        &self,
        session: &RepositorySession,
        request: &CollectRequest,
    ) -> impl Future<Output = anyhow::Result<DependencyGraph>> + Send;

    /// Fetch one artifact; the result is bound to its local file.
    fn resolve_artifact(
        &self,
        session: &RepositorySession,
        request: &ArtifactRequest,
    ) -> impl Future<Output = anyhow::Result<Artifact>> + Send;

    /// Fetch every node of `graph` that `filter` accepts, in preorder.
    fn resolve_artifacts(
        &self,
        session: &RepositorySession,
        graph: &DependencyGraph,
        filter: &dyn DependencyFilter,
        repositories: &[RemoteRepository],
    ) -> impl Future<Output = anyhow::Result<Vec<Artifact>>> + Send {
        async move {
            let mut resolved = Vec::new();
            for node in graph.flatten(filter) {
                let request = ArtifactRequest::new(node.artifact().clone(), repositories.to_vec());
                resolved.push(self.resolve_artifact(session, &request).await?);
            }
            Ok(resolved)
        }
    }

    /// Parent coordinates declared by the POM at `pom`, if it has a parent.
    fn read_model_parent(
        &self,
        pom: &Path,
    ) -> impl Future<Output = anyhow::Result<Option<Artifact>>> + Send;
}
