//! Classpath reconciliation.
//!
//! A [`Classpath`] merges the closures of a project's declared dependencies into one
//! ordered set of files:
//!
//! 1. The project's own classpath elements for the requested scopes come first.
//! 2. Every declared dependency in a requested scope becomes a [`RootArtifact`]; roots are
//!    visited in declaration order and their children in resolver order.
//! 3. Two artifacts with the same group, artifactId and classifier never coexist. When a
//!    second version shows up, the higher one (by
//!    [`GenericVersion`](crate::version::GenericVersion) ordering) keeps the
//!    slot of the first.
//! 4. Children matched by the root's exclusions are dropped.
//!
//! Roots are built once per `Classpath`, so their memoized closures are shared by
//! [`files`](Classpath::files), [`artifacts`](Classpath::artifacts) and
//! [`render`](Classpath::render). Build a new `Classpath` to see changed repositories.
//!
//! # Examples
//!
//! ```rust,no_run
//! use mvn_classpath::classpath::{Classpath, ProjectModel};
//! use mvn_classpath::resolver::{Aether, ResolverService};
//!
//! # async fn example<S: ResolverService>(aether: Aether<S>, project: ProjectModel)
//! #     -> mvn_classpath::core::Result<()> {
//! let classpath = Classpath::new(aether, &project, &["test"])?;
//! let joined = classpath
//!     .files()
//!     .await?
//!     .iter()
//!     .map(|f| f.display().to_string())
//!     .collect::<Vec<_>>()
//!     .join(":");
//! println!("{joined}");
//! # Ok(())
//! # }
//! ```

use crate::artifact::{Artifact, Coordinate, Dependency, Scope};
use crate::core::Result;
use crate::repository::RemoteRepository;
use crate::resolver::{Aether, ResolverService};
use crate::root::RootArtifact;
use crate::version::VersionComparator;
use indexmap::{IndexMap, IndexSet};
use std::path::PathBuf;

/// The parts of a project the classpath is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectModel {
    /// Declared dependencies, in POM order.
    pub dependencies: Vec<Dependency>,
    pub compile_classpath_elements: Vec<PathBuf>,
    pub runtime_classpath_elements: Vec<PathBuf>,
    pub test_classpath_elements: Vec<PathBuf>,
    pub system_classpath_elements: Vec<PathBuf>,
    pub remote_repositories: Vec<RemoteRepository>,
}

impl ProjectModel {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    #[must_use]
    pub fn with_repository(mut self, repository: RemoteRepository) -> Self {
        self.remote_repositories.push(repository);
        self
    }

    /// The project's own classpath elements for `scopes`: test, runtime, system, then
    /// compile (also used for `provided`).
    pub fn classpath_elements(&self, scopes: &[Scope]) -> Vec<PathBuf> {
        let wants = |scope: Scope| scopes.contains(&scope);
        let mut elements = Vec::new();
        if wants(Scope::Test) {
            elements.extend(self.test_classpath_elements.iter().cloned());
        }
        if wants(Scope::Runtime) {
            elements.extend(self.runtime_classpath_elements.iter().cloned());
        }
        if wants(Scope::System) {
            elements.extend(self.system_classpath_elements.iter().cloned());
        }
        if wants(Scope::Compile) || wants(Scope::Provided) {
            elements.extend(self.compile_classpath_elements.iter().cloned());
        }
        elements
    }
}

/// The ordered, deduplicated file set for a project in a set of scopes.
pub struct Classpath<S> {
    scopes: Vec<Scope>,
    elements: Vec<PathBuf>,
    roots: Vec<(Dependency, RootArtifact<S>)>,
}

impl<S: ResolverService> Classpath<S> {
    /// Plan the classpath of `project` for `scopes`.
    ///
    /// Nothing is resolved yet.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError`](crate::core::ResolveError::ConfigurationError) for an unknown
    /// scope name.
    pub fn new(aether: Aether<S>, project: &ProjectModel, scopes: &[&str]) -> Result<Self> {
        let scopes = scopes
            .iter()
            .map(|name| name.parse::<Scope>())
            .collect::<Result<Vec<_>>>()?;

        let elements = project.classpath_elements(&scopes);
        let roots = project
            .dependencies
            .iter()
            .filter(|dependency| scopes.contains(&dependency.scope))
            .map(|dependency| {
                let root = RootArtifact::new(
                    aether.clone(),
                    dependency.artifact.clone(),
                    dependency.exclusions.clone(),
                );
                (dependency.clone(), root)
            })
            .collect();

        Ok(Self {
            scopes,
            elements,
            roots,
        })
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Resolved artifacts after conflict resolution and exclusions, in classpath order.
    pub async fn artifacts(&self) -> Result<Vec<Artifact>> {
        let mut merged: IndexMap<Coordinate, Artifact> = IndexMap::new();
        for (_, root) in &self.roots {
            for child in root.children().await? {
                let coordinate = child.coordinate();
                if let Some(found) = merged.get_mut(&coordinate) {
                    if found.version() != child.version()
                        && std::ptr::eq(VersionComparator::newer(child, found), child)
                    {
                        tracing::debug!("{child} replaces {found} on the classpath");
                        *found = child.clone();
                    }
                    continue;
                }
                if root.excluded(child) {
                    continue;
                }
                merged.insert(coordinate, child.clone());
            }
        }
        Ok(merged.into_values().collect())
    }

    /// Classpath elements followed by every artifact's file, without duplicates.
    pub async fn files(&self) -> Result<Vec<PathBuf>> {
        let mut files: IndexSet<PathBuf> = self.elements.iter().cloned().collect();
        for artifact in self.artifacts().await? {
            if let Some(file) = artifact.file() {
                files.insert(file.to_path_buf());
            }
        }
        Ok(files.into_iter().collect())
    }

    pub async fn len(&self) -> Result<usize> {
        Ok(self.files().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.files().await?.is_empty())
    }

    /// One block per root; a root that cannot be resolved renders as a `failed to load` line.
    pub async fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.roots.len());
        for (dependency, root) in &self.roots {
            match root.children().await {
                Ok(_) => lines.push(root.render().await),
                Err(e) => lines.push(format!("failed to load '{dependency}' {e}")),
            }
        }
        lines.join("\n")
    }
}

impl<S> std::fmt::Debug for Classpath<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classpath")
            .field("scopes", &self.scopes)
            .field("elements", &self.elements)
            .field("roots", &self.roots.len())
            .finish()
    }
}
