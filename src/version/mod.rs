//! Version ordering for highest-version-wins conflict resolution.
//!
//! Maven versions are not semantic versions: `4.10`, `1.0-SNAPSHOT`, `2.0.8`, `1.3.1-jboss`
//! all occur in the wild. [`GenericVersion`] gives every string a place in one total order,
//! and [`VersionComparator`] applies it to artifacts.

pub mod comparison;
pub mod generic;

pub use comparison::VersionComparator;
pub use generic::GenericVersion;
