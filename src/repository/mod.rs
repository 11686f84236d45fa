//! Remote repositories: live request objects and immutable snapshots.
//!
//! Two families of types live here:
//!
//! - **Live objects** ([`RemoteRepository`], [`Proxy`], [`Authentication`]) are what callers
//!   build and what a [`ResolverService`](crate::resolver::ResolverService) receives in a
//!   request. They have public fields and are freely mutated while a request is assembled.
//! - **Descriptors** ([`RepositoryDescriptor`] and its proxy/authentication value objects)
//!   are taken once when the facade is configured. A descriptor owns deep copies of
//!   everything, including mirrored repositories, so later edits to the live object never
//!   leak into resolutions already configured, and descriptors can be shared across threads.
//!
//! Before snapshotting, the facade rewrites the requested repositories through the
//! [`MirrorSelector`], [`ProxySelector`] and [`AuthenticationSelector`].
//!
//! Credentials are wrapped in [`Secret`], whose `Debug` and `Display` never print the value.

pub mod descriptor;
pub mod mirror;
pub mod proxy;

pub use descriptor::{RepositoryAuthentication, RepositoryDescriptor, RepositoryProxy};
pub use mirror::{Mirror, MirrorSelector, select_mirrors};
pub use proxy::{AuthenticationSelector, ProxySelector, ProxySettings, ServerSettings};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default repository layout.
pub const DEFAULT_CONTENT_TYPE: &str = "default";

/// URL schemes the resolver can talk to; other repositories are dropped from requests.
pub const SUPPORTED_PROTOCOLS: [&str; 4] = ["http", "https", "file", "s3"];

/// A credential that is never printed.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw value, for handing to a transport.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Update and checksum policy for one of release/snapshot artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryPolicy {
    pub enabled: bool,
    /// `always`, `daily`, `never` or `interval:<minutes>`
    pub update_policy: String,
    /// `fail`, `warn` or `ignore`
    pub checksum_policy: String,
}

impl Default for RepositoryPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            update_policy: "daily".to_string(),
            checksum_policy: "warn".to_string(),
        }
    }
}

impl RepositoryPolicy {
    /// A policy that turns the artifact class off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Credentials for a repository or proxy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Authentication {
    pub username: Option<String>,
    pub password: Option<Secret>,
    pub private_key_file: Option<PathBuf>,
    pub passphrase: Option<Secret>,
}

impl Authentication {
    /// Username/password credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(Secret::new(password)),
            ..Self::default()
        }
    }
}

/// A proxy a repository is reached through.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Proxy {
    /// Protocol spoken to the proxy, usually `http` or `https`.
    pub proxy_type: String,
    pub host: String,
    pub port: u16,
    pub authentication: Option<Authentication>,
}

/// A live remote repository as handed to the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteRepository {
    pub id: String,
    pub content_type: String,
    pub url: String,
    pub release_policy: RepositoryPolicy,
    pub snapshot_policy: RepositoryPolicy,
    pub proxy: Option<Proxy>,
    pub authentication: Option<Authentication>,
    /// Repositories this one stands in for, when it is a mirror.
    pub mirrored_repositories: Vec<RemoteRepository>,
    pub repository_manager: bool,
}

impl RemoteRepository {
    /// A repository with default policies and no proxy or credentials.
    pub fn new(
        id: impl Into<String>,
        content_type: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            content_type: content_type.into(),
            url: url.into(),
            release_policy: RepositoryPolicy::default(),
            snapshot_policy: RepositoryPolicy::default(),
            proxy: None,
            authentication: None,
            mirrored_repositories: Vec::new(),
            repository_manager: false,
        }
    }

    #[must_use]
    pub fn with_authentication(mut self, authentication: Authentication) -> Self {
        self.authentication = Some(authentication);
        self
    }

    #[must_use]
    pub fn with_proxy(mut self, proxy: Proxy) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// The URL scheme, lower-cased, or an empty string when the URL does not parse.
    pub fn protocol(&self) -> String {
        url::Url::parse(&self.url)
            .map(|url| url.scheme().to_ascii_lowercase())
            .unwrap_or_default()
    }

    /// The URL host, if the URL has one.
    pub fn host(&self) -> Option<String> {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
    }

    /// Whether the resolver supports this repository's transport.
    pub fn is_supported_transport(&self) -> bool {
        SUPPORTED_PROTOCOLS.contains(&self.protocol().as_str())
    }
}

impl fmt::Display for RemoteRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_summary(
            f,
            &self.id,
            &self.url,
            &self.content_type,
            self.release_policy.enabled,
            self.snapshot_policy.enabled,
            self.repository_manager,
        )
    }
}

/// `id (url, type, releases+snapshots[, managed])`, shared by live and snapshot forms.
pub(crate) fn write_summary(
    f: &mut fmt::Formatter<'_>,
    id: &str,
    url: &str,
    content_type: &str,
    releases: bool,
    snapshots: bool,
    manager: bool,
) -> fmt::Result {
    let policies = match (releases, snapshots) {
        (true, true) => "releases+snapshots",
        (true, false) => "releases",
        (false, true) => "snapshots",
        (false, false) => "disabled",
    };
    write!(f, "{id} ({url}, {content_type}, {policies}")?;
    if manager {
        f.write_str(", managed")?;
    }
    f.write_str(")")
}
