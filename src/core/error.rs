//! Error handling for mvn-classpath
//!
//! Every fallible operation in the crate returns [`ResolveError`]. The error kinds map onto
//! the ways a classpath request can go wrong:
//!
//! - **Caller mistakes**: [`ResolveError::InvalidArgument`] for empty coordinates or paths
//! - **Configuration**: [`ResolveError::ConfigurationError`] for unknown scopes,
//!   [`ResolveError::Settings`] for unreadable settings files
//! - **Resolution**: [`ResolveError::DependencyResolutionFailure`] wrapping whatever the
//!   underlying resolver reported, [`ResolveError::GraphBuildFailure`] when a build tool
//!   could not hand over its dependency graph
//! - **Local I/O**: [`ResolveError::Io`] from lock acquisition on the local repository
//!
//! Causes coming out of a [`ResolverService`](crate::resolver::ResolverService) are plain
//! [`anyhow::Error`] values; the facade attaches the root coordinate, the repositories that
//! were consulted and the local repository path before handing the error to the caller.
//!
//! # Examples
//!
//! ```rust,no_run
//! use mvn_classpath::core::ResolveError;
//!
//! fn describe(error: &ResolveError) -> &'static str {
//!     match error {
//!         ResolveError::DependencyResolutionFailure { .. } => "resolution failed",
//!         ResolveError::ConfigurationError { .. } => "bad configuration",
//!         _ => "other",
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for classpath resolution.
///
/// Resolution failures never carry credentials: repositories are rendered through
/// [`RepositoryDescriptor::auth_summary`](crate::repository::RepositoryDescriptor::auth_summary),
/// which reports only the presence of a password.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A public entry point received an unusable argument.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the offending parameter
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Configuration that cannot be turned into a resolution request.
    ///
    /// Raised for unknown scope names before any request reaches the resolver. Not retried.
    #[error("Configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration error
        message: String,
    },

    /// The resolver failed to produce the transitive closure of `root`.
    ///
    /// # Fields
    /// - `root`: The root dependency, e.g. `junit:junit:jar:4.10 (compile)`
    /// - `repositories`: Every repository in the request, each with its authentication summary
    /// - `local_repository`: Directory of the local repository the session used
    /// - `source`: The failure reported by the resolver
    #[error(
        "failed to load '{root}' from [{}] into {}: {source}",
        .repositories.join(", "),
        .local_repository.display()
    )]
    DependencyResolutionFailure {
        /// The root dependency of the failed request
        root: String,
        /// Repositories consulted, rendered without secrets
        repositories: Vec<String>,
        /// Local repository directory
        local_repository: PathBuf,
        /// Underlying resolver failure
        source: anyhow::Error,
    },

    /// A [`DependencyGraphBuilder`](crate::graph_classpath::DependencyGraphBuilder) could not
    /// produce the project's graph.
    #[error("Failed to build the dependency graph: {source}")]
    GraphBuildFailure {
        /// Failure reported by the builder
        source: anyhow::Error,
    },

    /// A settings file exists but could not be read or parsed.
    #[error("Failed to load resolver settings from {}", .path.display())]
    Settings {
        /// Path of the settings file
        path: PathBuf,
        /// Read or parse failure
        source: anyhow::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResolveError {
    /// Shorthand for [`ResolveError::InvalidArgument`].
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ResolveError::ConfigurationError`].
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Whether this error came out of the resolver rather than from local validation.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(self, Self::DependencyResolutionFailure { .. })
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = ResolveError> = std::result::Result<T, E>;
