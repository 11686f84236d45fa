//! A declared dependency together with its resolved closure.

use crate::artifact::{Artifact, Exclusion, Scope};
use crate::core::{ResolveError, Result};
use crate::repository::{RemoteRepository, RepositoryDescriptor};
use crate::resolver::{
    Aether, ArtifactRequest, NonOptionalFilter, RepositorySession, ResolverService,
};
use std::fmt::Write as _;
use tokio::sync::OnceCell;

/// A top-level artifact whose non-optional transitive closure is fetched once.
pub struct RootArtifact<S> {
    aether: Aether<S>,
    artifact: Artifact,
    exclusions: Vec<Exclusion>,
    children: OnceCell<Vec<Artifact>>,
}

impl<S: ResolverService> RootArtifact<S> {
    pub fn new(aether: Aether<S>, artifact: Artifact, exclusions: Vec<Exclusion>) -> Self {
        Self {
            aether,
            artifact,
            exclusions,
            children: OnceCell::new(),
        }
    }

    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    pub fn exclusions(&self) -> &[Exclusion] {
        &self.exclusions
    }

    /// The closure of this root, resolved in compile scope without optional dependencies.
    ///
    /// The first successful resolution is kept for the lifetime of this value. A failure is
    /// returned as is and the next call tries again.
    pub async fn children(&self) -> Result<&[Artifact]> {
        let children = self
            .children
            .get_or_try_init(|| async {
                self.aether
                    .resolve_with_filter(&self.artifact, Scope::Compile.as_str(), &NonOptionalFilter)
                    .await
            })
            .await?;
        Ok(children)
    }

    /// Whether an exclusion of this root matches `artifact` by group and artifactId.
    pub fn excluded(&self, artifact: &Artifact) -> bool {
        self.exclusions.iter().any(|exclusion| exclusion.matches(artifact))
    }

    /// Resolve the parent POM declared by this root's POM file, if any.
    ///
    /// # Errors
    ///
    /// [`ResolveError::InvalidArgument`] when the root is not bound to its POM file;
    /// [`ResolveError::DependencyResolutionFailure`] when the POM cannot be read or the
    /// parent cannot be fetched.
    pub async fn lookup_parent<R: ResolverService>(
        &self,
        service: &R,
        session: &RepositorySession,
        repositories: &[RemoteRepository],
    ) -> Result<Option<Artifact>> {
        let pom = self.artifact.file().ok_or_else(|| {
            ResolveError::invalid_argument(
                "artifact",
                format!("'{}' is not bound to its POM file", self.artifact),
            )
        })?;

        let failure = |source: anyhow::Error| ResolveError::DependencyResolutionFailure {
            root: self.artifact.to_string(),
            repositories: repositories
                .iter()
                .map(|repo| {
                    let descriptor = RepositoryDescriptor::snapshot(repo);
                    format!("{descriptor} {}", descriptor.auth_summary())
                })
                .collect(),
            local_repository: session
                .local_repository_manager()
                .repository()
                .basedir()
                .to_path_buf(),
            source,
        };

        let Some(parent) = service.read_model_parent(pom).await.map_err(failure)? else {
            return Ok(None);
        };
        let request = ArtifactRequest::new(parent.with_extension("pom"), repositories.to_vec());
        let resolved = service
            .resolve_artifact(session, &request)
            .await
            .map_err(failure)?;
        Ok(Some(resolved))
    }

    /// `group:artifactId:version:N`, then one indented line per child.
    ///
    /// Never fails: a resolution error is appended to the header line.
    pub async fn render(&self) -> String {
        let mut text = format!(
            "{}:{}:{}:{}",
            self.artifact.group_id(),
            self.artifact.artifact_id(),
            self.artifact.version(),
            self.exclusions.len()
        );
        match self.children().await {
            Ok(children) => {
                for child in children {
                    let _ = write!(text, "\n  {child}");
                    if self.excluded(child) {
                        text.push_str(" (excluded)");
                    }
                }
            }
            Err(e) => {
                let _ = write!(text, " {e}");
            }
        }
        text
    }
}

impl<S> std::fmt::Debug for RootArtifact<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootArtifact")
            .field("artifact", &self.artifact)
            .field("exclusions", &self.exclusions)
            .field("resolved", &self.children.initialized())
            .finish_non_exhaustive()
    }
}
