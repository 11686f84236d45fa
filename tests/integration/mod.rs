//! Integration test suite for mvn-classpath
//!
//! End-to-end tests that drive the public API against the in-memory
//! [`MockResolver`](mvn_classpath::test_utils::MockResolver) from the `test-utils` feature.
//! Resolved artifacts are written under a temporary local repository, so file paths are
//! real.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **aether**: Facade behavior (transport filtering, failures, recovery, concurrency)
//! - **classpath**: Reconciliation (scopes, conflicts, exclusions, rendering)
//! - **graph_classpath**: Classpath read from a prebuilt dependency graph
//! - **mirrors**: Settings-driven mirror, proxy and credential selection
//! - **settings**: Loading settings files from the environment

mod aether;
mod classpath;
mod common;
mod graph_classpath;
mod mirrors;
