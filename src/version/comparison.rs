//! Version comparison helpers used by conflict resolution.
//!
//! These are thin conveniences over [`GenericVersion`] that work on raw version strings
//! and on [`Artifact`]s.
//!
//! # Examples
//!
//! ```rust
//! use mvn_classpath::version::VersionComparator;
//!
//! let versions = vec!["4.8".to_string(), "4.10".to_string(), "4.8.2".to_string()];
//! assert_eq!(VersionComparator::get_latest(&versions), Some(&"4.10".to_string()));
//! assert!(VersionComparator::is_newer("4.10", "4.8.2"));
//! ```

use super::GenericVersion;
use crate::artifact::Artifact;

/// Version comparison utilities.
pub struct VersionComparator;

impl VersionComparator {
    /// Whether `candidate` orders strictly after `current`.
    pub fn is_newer(candidate: &str, current: &str) -> bool {
        GenericVersion::parse(candidate) > GenericVersion::parse(current)
    }

    /// Pick the artifact with the higher version.
    ///
    /// `incoming` wins unless it is strictly older than `existing`, so two spellings of the
    /// same version (`1.0` and `1`) resolve to the one seen last.
    pub fn newer<'a>(incoming: &'a Artifact, existing: &'a Artifact) -> &'a Artifact {
        if GenericVersion::parse(incoming.version()) < GenericVersion::parse(existing.version()) {
            existing
        } else {
            incoming
        }
    }

    /// The highest version in `versions`, or `None` when empty.
    pub fn get_latest(versions: &[String]) -> Option<&String> {
        versions
            .iter()
            .map(|v| (v, GenericVersion::parse(v)))
            .reduce(|latest, next| if next.1 > latest.1 { next } else { latest })
            .map(|(v, _)| v)
    }
}
