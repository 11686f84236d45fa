//! Immutable repository snapshots.
//!
//! A [`RepositoryDescriptor`] is a deep copy of a [`RemoteRepository`]: identity, policies,
//! proxy, credentials and, recursively, the repositories it mirrors. The facade keeps only
//! descriptors and rebuilds a fresh live object for every request with
//! [`RepositoryDescriptor::to_remote`], so no live object is ever shared by two resolutions.

use super::{Authentication, Proxy, RemoteRepository, RepositoryPolicy, Secret, write_summary};
use std::fmt;
use std::path::{Path, PathBuf};

/// Snapshot of repository credentials.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryAuthentication {
    username: Option<String>,
    password: Option<Secret>,
    private_key_file: Option<PathBuf>,
    passphrase: Option<Secret>,
}

impl RepositoryAuthentication {
    pub fn snapshot(auth: &Authentication) -> Self {
        Self {
            username: auth.username.clone(),
            password: auth.password.clone(),
            private_key_file: auth.private_key_file.clone(),
            passphrase: auth.passphrase.clone(),
        }
    }

    pub fn to_live(&self) -> Authentication {
        Authentication {
            username: self.username.clone(),
            password: self.password.clone(),
            private_key_file: self.private_key_file.clone(),
            passphrase: self.passphrase.clone(),
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn private_key_file(&self) -> Option<&Path> {
        self.private_key_file.as_deref()
    }
}

/// Renders usernames and key paths; secrets only as `***`.
impl fmt::Display for RepositoryAuthentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(username) = &self.username {
            parts.push(format!("username={username}"));
        }
        if self.password.is_some() {
            parts.push("password=***".to_string());
        }
        if let Some(key) = &self.private_key_file {
            parts.push(format!("privateKey={}", key.display()));
        }
        if self.passphrase.is_some() {
            parts.push("passphrase=***".to_string());
        }
        if parts.is_empty() {
            f.write_str("empty credentials")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

/// Snapshot of a proxy, including its own credentials.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryProxy {
    proxy_type: String,
    host: String,
    port: u16,
    auth: Option<RepositoryAuthentication>,
}

impl RepositoryProxy {
    pub fn snapshot(proxy: &Proxy) -> Self {
        Self {
            proxy_type: proxy.proxy_type.clone(),
            host: proxy.host.clone(),
            port: proxy.port,
            auth: proxy.authentication.as_ref().map(RepositoryAuthentication::snapshot),
        }
    }

    pub fn to_live(&self) -> Proxy {
        Proxy {
            proxy_type: self.proxy_type.clone(),
            host: self.host.clone(),
            port: self.port,
            authentication: self.auth.as_ref().map(RepositoryAuthentication::to_live),
        }
    }

    pub fn proxy_type(&self) -> &str {
        &self.proxy_type
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn authentication(&self) -> Option<&RepositoryAuthentication> {
        self.auth.as_ref()
    }
}

/// Immutable, thread-safe copy of a remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryDescriptor {
    id: String,
    content_type: String,
    url: String,
    release: RepositoryPolicy,
    snapshot: RepositoryPolicy,
    proxy: Option<RepositoryProxy>,
    authentication: Option<RepositoryAuthentication>,
    mirrored: Vec<RepositoryDescriptor>,
    manager: bool,
}

impl RepositoryDescriptor {
    /// Deep-copy `remote`. The descriptor keeps no reference to it.
    pub fn snapshot(remote: &RemoteRepository) -> Self {
        Self {
            id: remote.id.clone(),
            content_type: remote.content_type.clone(),
            url: remote.url.clone(),
            release: remote.release_policy.clone(),
            snapshot: remote.snapshot_policy.clone(),
            proxy: remote.proxy.as_ref().map(RepositoryProxy::snapshot),
            authentication: remote
                .authentication
                .as_ref()
                .map(RepositoryAuthentication::snapshot),
            mirrored: remote.mirrored_repositories.iter().map(Self::snapshot).collect(),
            manager: remote.repository_manager,
        }
    }

    /// Rebuild a live repository for a single request.
    pub fn to_remote(&self) -> RemoteRepository {
        RemoteRepository {
            id: self.id.clone(),
            content_type: self.content_type.clone(),
            url: self.url.clone(),
            release_policy: self.release.clone(),
            snapshot_policy: self.snapshot.clone(),
            proxy: self.proxy.as_ref().map(RepositoryProxy::to_live),
            authentication: self.authentication.as_ref().map(RepositoryAuthentication::to_live),
            mirrored_repositories: self.mirrored.iter().map(Self::to_remote).collect(),
            repository_manager: self.manager,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn release_policy(&self) -> &RepositoryPolicy {
        &self.release
    }

    pub fn snapshot_policy(&self) -> &RepositoryPolicy {
        &self.snapshot
    }

    pub fn proxy(&self) -> Option<&RepositoryProxy> {
        self.proxy.as_ref()
    }

    pub fn authentication(&self) -> Option<&RepositoryAuthentication> {
        self.authentication.as_ref()
    }

    pub fn mirrored(&self) -> &[RepositoryDescriptor] {
        &self.mirrored
    }

    pub fn is_repository_manager(&self) -> bool {
        self.manager
    }

    /// `without authentication`, or `with <credentials>` where secrets show as `***`.
    pub fn auth_summary(&self) -> String {
        match &self.authentication {
            None => "without authentication".to_string(),
            Some(auth) => format!("with {auth}"),
        }
    }
}

impl fmt::Display for RepositoryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_summary(
            f,
            &self.id,
            &self.url,
            &self.content_type,
            self.release.enabled,
            self.snapshot.enabled,
            self.manager,
        )
    }
}
