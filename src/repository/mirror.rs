//! Mirror selection.
//!
//! A [`Mirror`] declares which repositories it stands in for through `mirror_of`:
//!
//! | Pattern | Matches |
//! |---|---|
//! | `*` | every repository |
//! | `external:*` | repositories not on localhost and not using `file:` |
//! | `external:http:*` | external repositories using plain `http` |
//! | `central,snapshots` | the listed repository ids |
//! | `*,!internal` | everything except `internal` |
//!
//! `mirror_of_layouts` restricts matching to repository layouts with the same list and
//! negation grammar; an empty value accepts any layout. A mirror naming the repository id
//! exactly takes precedence over one matching it through a pattern, and among equals the
//! first configured mirror wins.

use super::{DEFAULT_CONTENT_TYPE, RemoteRepository};
use serde::{Deserialize, Serialize};

const WILDCARD: &str = "*";
const EXTERNAL_WILDCARD: &str = "external:*";
const EXTERNAL_HTTP_WILDCARD: &str = "external:http:*";

fn default_layout() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

/// A configured mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mirror {
    pub id: String,
    pub url: String,
    #[serde(default = "default_layout")]
    pub layout: String,
    pub mirror_of: String,
    #[serde(default)]
    pub mirror_of_layouts: String,
}

impl Mirror {
    pub fn new(id: impl Into<String>, url: impl Into<String>, mirror_of: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            layout: default_layout(),
            mirror_of: mirror_of.into(),
            mirror_of_layouts: String::new(),
        }
    }
}

/// Maps repositories onto configured mirrors.
#[derive(Debug, Clone, Default)]
pub struct MirrorSelector {
    mirrors: Vec<Mirror>,
}

impl MirrorSelector {
    pub fn from_mirrors(mirrors: &[Mirror]) -> Self {
        Self {
            mirrors: mirrors.to_vec(),
        }
    }

    /// The mirror repository replacing `repository`, or `None` when no mirror applies.
    ///
    /// The mirror keeps the original's policies and lists the original as its mirrored
    /// repository. Proxy and credentials are not inherited; they are selected for the mirror
    /// by id afterwards.
    pub fn select(&self, repository: &RemoteRepository) -> Option<RemoteRepository> {
        let mirror = self.find_mirror(repository)?;
        tracing::debug!("Repository '{}' is mirrored by '{}' at {}", repository.id, mirror.id, mirror.url);

        let content_type = if mirror.layout.is_empty() {
            repository.content_type.clone()
        } else {
            mirror.layout.clone()
        };
        let mut mirrored = RemoteRepository::new(mirror.id.clone(), content_type, mirror.url.clone());
        mirrored.release_policy = repository.release_policy.clone();
        mirrored.snapshot_policy = repository.snapshot_policy.clone();
        mirrored.mirrored_repositories = vec![repository.clone()];
        Some(mirrored)
    }

    fn find_mirror(&self, repository: &RemoteRepository) -> Option<&Mirror> {
        let layout = repository.content_type.as_str();
        self.mirrors
            .iter()
            .find(|m| m.mirror_of == repository.id && matches_layout(layout, &m.mirror_of_layouts))
            .or_else(|| {
                self.mirrors.iter().find(|m| {
                    matches_pattern(repository, &m.mirror_of)
                        && matches_layout(layout, &m.mirror_of_layouts)
                })
            })
    }
}

/// Replace every repository that has a mirror; pass the rest through unchanged.
pub fn select_mirrors(mirrors: &[Mirror], repositories: &[RemoteRepository]) -> Vec<RemoteRepository> {
    let selector = MirrorSelector::from_mirrors(mirrors);
    repositories
        .iter()
        .map(|repo| selector.select(repo).unwrap_or_else(|| repo.clone()))
        .collect()
}

fn is_external(repository: &RemoteRepository) -> bool {
    let local_host = matches!(repository.host().as_deref(), Some("localhost" | "127.0.0.1"));
    !local_host && repository.protocol() != "file"
}

fn matches_pattern(repository: &RemoteRepository, pattern: &str) -> bool {
    if pattern == WILDCARD || pattern == repository.id {
        return true;
    }

    let mut result = false;
    for entry in pattern.split(',').map(str::trim) {
        if let Some(excluded) = entry.strip_prefix('!').filter(|rest| !rest.is_empty()) {
            if excluded == repository.id {
                return false;
            }
        } else if entry == repository.id {
            return true;
        } else if entry == WILDCARD
            || (entry == EXTERNAL_WILDCARD && is_external(repository))
            || (entry == EXTERNAL_HTTP_WILDCARD
                && is_external(repository)
                && repository.protocol() == "http")
        {
            // keep scanning: a later entry may exclude this repository
            result = true;
        }
    }
    result
}

fn matches_layout(layout: &str, pattern: &str) -> bool {
    if pattern.is_empty() || pattern == WILDCARD || pattern == layout {
        return true;
    }

    let mut result = false;
    for entry in pattern.split(',').map(str::trim) {
        if let Some(excluded) = entry.strip_prefix('!').filter(|rest| !rest.is_empty()) {
            if excluded == layout {
                return false;
            }
        } else if entry == layout {
            return true;
        } else if entry == WILDCARD {
            result = true;
        }
    }
    result
}
