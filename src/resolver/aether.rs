//! The resolver facade.
//!
//! [`Aether`] turns "give me the classpath closure of this artifact in this scope" into a
//! collect + resolve round trip against a [`ResolverService`]:
//!
//! 1. Remote repositories are rewritten once, at construction, through the mirror, proxy and
//!    authentication selectors built from [`ResolverSettings`], then frozen as
//!    [`RepositoryDescriptor`]s.
//! 2. Each request rebuilds live repositories from the descriptors, dropping those whose
//!    transport is not `http`, `https`, `file` or `s3`.
//! 3. A fresh [`RepositorySession`] is opened for the request.
//! 4. The service runs while the local repository is locked.
//! 5. Failures come back as [`ResolveError::DependencyResolutionFailure`] naming the root,
//!    every repository consulted (credentials masked) and the local repository.
//!
//! # Examples
//!
//! ```rust,no_run
//! use mvn_classpath::config::ResolverSettings;
//! use mvn_classpath::repository::RemoteRepository;
//! use mvn_classpath::resolver::{Aether, ResolverService};
//! use std::sync::Arc;
//!
//! # async fn example<S: ResolverService>(service: Arc<S>) -> mvn_classpath::core::Result<()> {
//! let central = RemoteRepository::new("central", "default", "https://repo1.maven.org/maven2/");
//! let aether = Aether::new(service, &[central], "/tmp/m2", &ResolverSettings::default())?;
//! let deps = aether.resolve(&"junit:junit:4.10".parse()?, "runtime").await?;
//! for artifact in deps {
//!     println!("{}", artifact.file().unwrap().display());
//! }
//! # Ok(())
//! # }
//! ```

use super::graph::{DependencyFilter, ScopeDependencyFilter};
use super::lock::LocalRepositoryLock;
use super::service::{
    CollectRequest, LocalRepository, LogTransferListener, RepositorySession, ResolverService,
};
use crate::artifact::{Artifact, Dependency, Scope};
use crate::classpath::ProjectModel;
use crate::config::ResolverSettings;
use crate::core::{ResolveError, Result};
use crate::repository::{
    AuthenticationSelector, ProxySelector, RemoteRepository, RepositoryDescriptor, select_mirrors,
};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Resolves transitive closures against a fixed set of remote repositories.
pub struct Aether<S> {
    service: Arc<S>,
    remotes: Vec<RepositoryDescriptor>,
    local: PathBuf,
}

impl<S: ResolverService> Aether<S> {
    /// Build a facade over `repositories`, downloading into `local_repository`.
    ///
    /// Mirrors from `settings` replace matching repositories; proxies and server credentials
    /// are attached where a repository has none of its own.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::InvalidArgument`] if `local_repository` is empty
    /// - [`ResolveError::ConfigurationError`] if a proxy's `non_proxy_hosts` is malformed
    pub fn new(
        service: Arc<S>,
        repositories: &[RemoteRepository],
        local_repository: impl Into<PathBuf>,
        settings: &ResolverSettings,
    ) -> Result<Self> {
        let local = local_repository.into();
        if local.as_os_str().is_empty() {
            return Err(ResolveError::invalid_argument(
                "local_repository",
                "local repository path must not be empty",
            ));
        }

        let proxies = ProxySelector::new(&settings.proxies)?;
        let servers = AuthenticationSelector::new(&settings.servers);
        let remotes = select_mirrors(&settings.mirrors, repositories)
            .into_iter()
            .map(|mut repo| {
                if repo.proxy.is_none() {
                    repo.proxy = proxies.select(&repo);
                }
                if repo.authentication.is_none() {
                    repo.authentication = servers.select(&repo);
                }
                RepositoryDescriptor::snapshot(&repo)
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            "Resolver configured with {} repositories into {}",
            remotes.len(),
            local.display()
        );
        Ok(Self {
            service,
            remotes,
            local,
        })
    }

    /// Build a facade over the project's remote repositories.
    pub fn for_project(
        service: Arc<S>,
        project: &ProjectModel,
        local_repository: impl Into<PathBuf>,
        settings: &ResolverSettings,
    ) -> Result<Self> {
        Self::new(service, &project.remote_repositories, local_repository, settings)
    }

    /// Build a facade whose local repository comes from `settings`.
    pub fn from_settings(
        service: Arc<S>,
        repositories: &[RemoteRepository],
        settings: &ResolverSettings,
    ) -> Result<Self> {
        let local = settings.local_repository_path()?;
        Self::new(service, repositories, local, settings)
    }

    /// Transitive dependencies of `root` on the classpath of `scope`.
    ///
    /// # Errors
    ///
    /// Unknown scope names and `import` fail with [`ResolveError::ConfigurationError`]
    /// before the resolver is called.
    pub async fn resolve(&self, root: &Artifact, scope: &str) -> Result<Vec<Artifact>> {
        let parsed = parse_scope(scope)?;
        let filter = ScopeDependencyFilter::classpath(parsed)?;
        self.resolve_with_filter(root, scope, &filter).await
    }

    /// Transitive dependencies of `root` accepted by `filter`.
    ///
    /// `root` is requested as a dependency in `scope`. Every returned artifact is bound to a
    /// file in the local repository.
    pub async fn resolve_with_filter(
        &self,
        root: &Artifact,
        scope: &str,
        filter: &dyn DependencyFilter,
    ) -> Result<Vec<Artifact>> {
        root.validate()?;
        let scope = parse_scope(scope)?;
        let request = self.request(Dependency::new(root.clone(), scope));
        let session = self.session()?;

        tracing::debug!(
            "Resolving {} from {} repositories",
            request.root,
            request.repositories.len()
        );

        let result = {
            let _lock = LocalRepositoryLock::acquire(&self.local).await?;
            self.fetch(&session, &request, filter).await
        };

        match result {
            Ok(artifacts) => {
                tracing::debug!("Resolved {} artifacts for {}", artifacts.len(), request.root);
                Ok(artifacts)
            }
            Err(source) => Err(self.failure(&request, source)),
        }
    }

    async fn fetch(
        &self,
        session: &RepositorySession,
        request: &CollectRequest,
        filter: &dyn DependencyFilter,
    ) -> anyhow::Result<Vec<Artifact>> {
        let graph = self.service.collect_dependencies(session, request).await?;
        let artifacts = self
            .service
            .resolve_artifacts(session, &graph, filter, &request.repositories)
            .await?;
        if let Some(unbound) = artifacts.iter().find(|a| a.file().is_none()) {
            anyhow::bail!("artifact '{unbound}' was resolved without a file");
        }
        Ok(artifacts)
    }

    fn request(&self, root: Dependency) -> CollectRequest {
        let repositories = self
            .supported()
            .map(RepositoryDescriptor::to_remote)
            .collect();
        CollectRequest { root, repositories }
    }

    fn supported(&self) -> impl Iterator<Item = &RepositoryDescriptor> {
        self.remotes.iter().filter(|descriptor| {
            let supported = descriptor.to_remote().is_supported_transport();
            if !supported {
                tracing::warn!("{descriptor} ignored (only S3, HTTP/S, and FILE are supported)");
            }
            supported
        })
    }

    /// A session with the service's manager for our local repository.
    pub fn session(&self) -> Result<RepositorySession> {
        let manager = self
            .service
            .new_local_repository_manager(&LocalRepository::new(&self.local))?;
        Ok(RepositorySession::new(manager, Arc::new(LogTransferListener)))
    }

    fn failure(&self, request: &CollectRequest, source: anyhow::Error) -> ResolveError {
        let repositories = request
            .repositories
            .iter()
            .map(|repo| {
                let descriptor = RepositoryDescriptor::snapshot(repo);
                format!("{descriptor} {}", descriptor.auth_summary())
            })
            .collect();
        ResolveError::DependencyResolutionFailure {
            root: request.root.to_string(),
            repositories,
            local_repository: self.local.clone(),
            source,
        }
    }
}

impl<S> Aether<S> {
    pub fn repositories(&self) -> &[RepositoryDescriptor] {
        &self.remotes
    }

    pub fn local_repository(&self) -> &Path {
        &self.local
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }
}

fn parse_scope(scope: &str) -> Result<Scope> {
    if scope.trim().is_empty() {
        return Err(ResolveError::invalid_argument("scope", "scope must not be empty"));
    }
    scope.parse()
}

impl<S> Clone for Aether<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            remotes: self.remotes.clone(),
            local: self.local.clone(),
        }
    }
}

/// Facades are equal when they consult the same repositories and local directory.
impl<S> PartialEq for Aether<S> {
    fn eq(&self, other: &Self) -> bool {
        self.remotes == other.remotes && self.local == other.local
    }
}

impl<S> Eq for Aether<S> {}

impl<S> fmt::Debug for Aether<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aether")
            .field("remotes", &self.remotes)
            .field("local", &self.local)
            .finish_non_exhaustive()
    }
}
