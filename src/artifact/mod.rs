//! Artifact identity and dependency declarations.
//!
//! An [`Artifact`] is the full `(group, artifactId, classifier, extension, version)` tuple,
//! optionally bound to a file in the local repository once resolved. Two artifacts share a
//! [`Coordinate`] when group, artifactId and classifier match regardless of version; the
//! classpath reconciler uses the coordinate as its dedup key.
//!
//! # Textual Form
//!
//! ```text
//! group:artifactId:version
//! group:artifactId:extension:version
//! group:artifactId:extension:classifier:version
//! ```
//!
//! # Examples
//!
//! ```rust
//! use mvn_classpath::artifact::Artifact;
//!
//! let junit: Artifact = "junit:junit:4.10".parse().unwrap();
//! assert_eq!(junit.extension(), "jar");
//! assert_eq!(junit.to_string(), "junit:junit:jar:4.10");
//! ```

mod scope;

pub use scope::Scope;

use crate::core::{ResolveError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default extension when a coordinate does not name one.
pub const DEFAULT_EXTENSION: &str = "jar";

/// An artifact, possibly bound to its file in the local repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Artifact {
    group_id: String,
    artifact_id: String,
    classifier: String,
    extension: String,
    version: String,
    file: Option<PathBuf>,
}

impl Artifact {
    /// Create an unresolved artifact. An empty `extension` becomes `jar`.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        classifier: impl Into<String>,
        extension: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        let extension = extension.into();
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            classifier: classifier.into(),
            extension: if extension.is_empty() {
                DEFAULT_EXTENSION.to_string()
            } else {
                extension
            },
            version: version.into(),
            file: None,
        }
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn classifier(&self) -> &str {
        &self.classifier
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The file this artifact resolved to, if any.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Bind the artifact to a file.
    #[must_use]
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Same group, artifactId and version with a different extension, e.g. the `pom`.
    #[must_use]
    pub fn with_extension(&self, extension: impl Into<String>) -> Self {
        Self::new(
            self.group_id.clone(),
            self.artifact_id.clone(),
            "",
            extension,
            self.version.clone(),
        )
    }

    /// The version-less identity used for conflict detection.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            classifier: self.classifier.clone(),
        }
    }

    /// Reject artifacts that cannot form a request.
    pub(crate) fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("groupId", &self.group_id),
            ("artifactId", &self.artifact_id),
            ("version", &self.version),
        ] {
            if value.trim().is_empty() {
                return Err(ResolveError::invalid_argument(
                    "artifact",
                    format!("{field} of '{self}' must not be empty"),
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.extension)?;
        if !self.classifier.is_empty() {
            write!(f, ":{}", self.classifier)?;
        }
        write!(f, ":{}", self.version)
    }
}

impl FromStr for Artifact {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let artifact = match parts.as_slice() {
            [group, artifact, version] => Self::new(*group, *artifact, "", "", *version),
            [group, artifact, extension, version] => {
                Self::new(*group, *artifact, "", *extension, *version)
            }
            [group, artifact, extension, classifier, version] => {
                Self::new(*group, *artifact, *classifier, *extension, *version)
            }
            _ => {
                return Err(ResolveError::invalid_argument(
                    "coordinates",
                    format!(
                        "bad artifact coordinates '{s}', expected \
                         <groupId>:<artifactId>[:<extension>[:<classifier>]]:<version>"
                    ),
                ));
            }
        };
        artifact.validate()?;
        Ok(artifact)
    }
}

/// Version-less identity: `(group, artifactId, classifier)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub classifier: String,
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        if !self.classifier.is_empty() {
            write!(f, ":{}", self.classifier)?;
        }
        Ok(())
    }
}

/// A `(group, artifactId)` rule suppressing a transitive artifact. `*` matches anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Exclusion {
    pub group_id: String,
    pub artifact_id: String,
}

impl Exclusion {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    /// Whether this rule suppresses `artifact`.
    pub fn matches(&self, artifact: &Artifact) -> bool {
        fn field(pattern: &str, value: &str) -> bool {
            pattern == "*" || pattern == value
        }
        field(&self.group_id, artifact.group_id()) && field(&self.artifact_id, artifact.artifact_id())
    }
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

/// An artifact together with how it is used: scope, optionality and exclusions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub artifact: Artifact,
    pub scope: Scope,
    pub optional: bool,
    pub exclusions: Vec<Exclusion>,
}

impl Dependency {
    pub fn new(artifact: Artifact, scope: Scope) -> Self {
        Self {
            artifact,
            scope,
            optional: false,
            exclusions: Vec::new(),
        }
    }

    #[must_use]
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    #[must_use]
    pub fn with_exclusion(mut self, exclusion: Exclusion) -> Self {
        self.exclusions.push(exclusion);
        self
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}{})",
            self.artifact,
            self.scope,
            if self.optional { "?" } else { "" }
        )
    }
}
