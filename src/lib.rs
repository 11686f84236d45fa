//! mvn-classpath - classpath reconciliation over a Maven-style artifact resolver
//!
//! Given a project's declared dependencies and remote repositories, this crate produces
//! the ordered set of files that make up its classpath for one or more scopes. Building the
//! transitive graph and downloading artifacts is delegated to a [`ResolverService`]
//! implementation; the crate owns everything around that call.
//!
//! # Architecture Overview
//!
//! ```text
//! ProjectModel + scopes + ResolverSettings
//!        │
//!        ▼
//!   Aether (facade)  ── mirrors / proxies / credentials → RepositoryDescriptor snapshots
//!        │
//!        ▼
//!   RootArtifact     ── one per declared dependency, closure fetched once
//!        │
//!        ▼
//!   Classpath        ── merge, exclusions, highest version wins → Vec<PathBuf>
//! ```
//!
//! # Core Modules
//!
//! - [`artifact`] - Artifacts, coordinates, exclusions, dependencies and scopes
//! - [`classpath`] - The classpath reconciler and the project model it reads
//! - [`config`] - Resolver settings (`~/.m2/resolver.toml`)
//! - [`core`] - Error type and result alias
//! - [`graph_classpath`] - Classpath read from a dependency graph the build tool supplies,
//!   without a resolver
//! - [`repository`] - Remote repositories, immutable descriptors, mirror/proxy/credential
//!   selection
//! - [`resolver`] - The service trait, dependency graphs and filters, the facade and the
//!   local repository lock
//! - [`root`] - Memoized closure of a single declared dependency
//! - [`version`] - Maven-style version ordering
//!
//! # Example
//!
//! ```rust,no_run
//! use mvn_classpath::artifact::{Dependency, Scope};
//! use mvn_classpath::classpath::{Classpath, ProjectModel};
//! use mvn_classpath::config::ResolverSettings;
//! use mvn_classpath::repository::RemoteRepository;
//! use mvn_classpath::resolver::{Aether, ResolverService};
//! use std::sync::Arc;
//!
//! # async fn example<S: ResolverService>(service: Arc<S>) -> mvn_classpath::core::Result<()> {
//! let settings = ResolverSettings::load().await?;
//! let project = ProjectModel::new()
//!     .with_dependency(Dependency::new("junit:junit:4.10".parse()?, Scope::Test))
//!     .with_repository(RemoteRepository::new(
//!         "central",
//!         "default",
//!         "https://repo1.maven.org/maven2/",
//!     ));
//!
//! let aether = Aether::for_project(service, &project, settings.local_repository_path()?, &settings)?;
//! let classpath = Classpath::new(aether, &project, &["test"])?;
//! for file in classpath.files().await? {
//!     println!("{}", file.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! The crate logs through `tracing`. Skipped repositories are reported at `warn`,
//! completed downloads at `info`, requests and conflict decisions at `debug`.

pub mod artifact;
pub mod classpath;
pub mod config;
pub mod core;
pub mod graph_classpath;
pub mod repository;
pub mod resolver;
pub mod root;
pub mod version;

// test_utils is available for tests and behind the `test-utils` feature
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use resolver::ResolverService;
