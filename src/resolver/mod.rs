//! Dependency resolution against a pluggable resolver service.
//!
//! The crate does not build dependency graphs or download anything itself. Those jobs
//! belong to a [`ResolverService`]; this module supplies what surrounds it:
//!
//! - [`graph`]: the dependency graph a service returns, and the filters that pick nodes
//!   from it
//! - [`service`]: the service trait with its session, requests, local repository layout
//!   and transfer listener
//! - [`lock`]: one resolution at a time per local repository, across tasks and processes
//! - [`aether`]: the facade that builds requests, filters transports, holds the lock and
//!   translates failures
//!
//! # Request Flow
//!
//! ```text
//! Aether::resolve(artifact, scope)
//!   ├─ scope → ScopeDependencyFilter          (ConfigurationError if unknown)
//!   ├─ descriptors → live repositories        (unsupported transports skipped)
//!   ├─ new RepositorySession
//!   └─ LocalRepositoryLock::acquire
//!        ├─ service.collect_dependencies → DependencyGraph
//!        └─ service.resolve_artifacts    → Vec<Artifact> bound to files
//! ```

pub mod aether;
pub mod graph;
pub mod lock;
pub mod service;

pub use aether::Aether;
pub use graph::{
    AndFilter, DependencyFilter, DependencyGraph, DependencyNode, NonOptionalFilter,
    ScopeDependencyFilter,
};
pub use lock::LocalRepositoryLock;
pub use service::{
    ArtifactRequest, CollectRequest, LocalRepository, LocalRepositoryManager,
    LogTransferListener, RepositorySession, ResolverService, TransferListener,
    TransferResource,
};
