//! Resolver settings: mirrors, proxies, server credentials and the local repository.
//!
//! Settings come from up to two TOML files, read in this order:
//!
//! 1. **Global settings**, only when `MVN_CLASSPATH_GLOBAL_SETTINGS` names a file
//! 2. **User settings**, `MVN_CLASSPATH_USER_SETTINGS` or `~/.m2/resolver.toml`
//!
//! Entries in the user file replace global entries with the same id. Missing files are not
//! an error; they contribute nothing. A leading `~` in any path is expanded.
//!
//! # File Format
//!
//! ```toml
//! local_repository = "~/.m2/repository"
//!
//! [[mirrors]]
//! id = "corp-nexus"
//! url = "https://nexus.corp/repository/maven-public/"
//! mirror_of = "external:*,!snapshots"
//!
//! [[proxies]]
//! id = "corp-proxy"
//! protocol = "http"
//! host = "proxy.corp"
//! port = 3128
//! username = "proxyuser"
//! password = "proxypass"
//! non_proxy_hosts = "*.corp|localhost"
//!
//! [[servers]]
//! id = "releases"
//! username = "deployer"
//! password = "secret"
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use mvn_classpath::config::ResolverSettings;
//!
//! # async fn example() -> mvn_classpath::core::Result<()> {
//! let settings = ResolverSettings::load().await?;
//! println!("{} mirrors configured", settings.mirrors.len());
//! # Ok(())
//! # }
//! ```

use crate::core::{ResolveError, Result};
use crate::repository::{Mirror, ProxySettings, ServerSettings};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Environment variable overriding the user settings file.
pub const USER_SETTINGS_ENV: &str = "MVN_CLASSPATH_USER_SETTINGS";

/// Environment variable naming an optional global settings file.
pub const GLOBAL_SETTINGS_ENV: &str = "MVN_CLASSPATH_GLOBAL_SETTINGS";

/// Effective resolver settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// Local repository directory; `~/.m2/repository` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_repository: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mirrors: Vec<Mirror>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub proxies: Vec<ProxySettings>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<ServerSettings>,
}

/// Where the settings files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsLocations {
    pub user: PathBuf,
    pub global: Option<PathBuf>,
}

impl SettingsLocations {
    /// Resolve locations from the process environment.
    ///
    /// # Errors
    ///
    /// Fails when no override is set and the home directory cannot be determined.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve locations through `lookup`, which maps variable names to values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let user = match lookup(USER_SETTINGS_ENV).filter(|v| !v.trim().is_empty()) {
            Some(path) => expand(&path),
            None => default_m2_dir()?.join("resolver.toml"),
        };
        let global = lookup(GLOBAL_SETTINGS_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(|path| expand(&path));
        Ok(Self { user, global })
    }
}

impl ResolverSettings {
    /// Load global then user settings from the locations named by the environment.
    pub async fn load() -> Result<Self> {
        Self::load_with(&SettingsLocations::from_env()?).await
    }

    /// Load global then user settings from explicit locations.
    pub async fn load_with(locations: &SettingsLocations) -> Result<Self> {
        let global = match &locations.global {
            Some(path) => Self::load_optional(path).await?,
            None => Self::default(),
        };
        let user = Self::load_optional(&locations.user).await?;
        tracing::debug!(
            "Loaded resolver settings (user: {}, global: {})",
            locations.user.display(),
            locations
                .global
                .as_deref()
                .map_or_else(|| "none".to_string(), |p| p.display().to_string())
        );
        Ok(global.merge(user))
    }

    /// Load a settings file, or defaults when it does not exist.
    pub async fn load_optional(path: &Path) -> Result<Self> {
        if fs::try_exists(path).await.unwrap_or(false) {
            Self::load_from(path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load a settings file that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Settings`] if the file cannot be read or is not valid TOML.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read resolver settings from {}", path.display()))
            .map_err(|source| ResolveError::Settings {
                path: path.to_path_buf(),
                source,
            })?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse resolver settings from {}", path.display()))
            .map_err(|source| ResolveError::Settings {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Overlay `user` on top of `self`; entries with the same id are replaced.
    #[must_use]
    pub fn merge(mut self, user: Self) -> Self {
        if user.local_repository.is_some() {
            self.local_repository = user.local_repository;
        }
        for mirror in user.mirrors {
            self.mirrors.retain(|m| m.id != mirror.id);
            self.mirrors.push(mirror);
        }
        for proxy in user.proxies {
            if proxy.id.is_some() {
                self.proxies.retain(|p| p.id != proxy.id);
            }
            self.proxies.push(proxy);
        }
        for server in user.servers {
            self.servers.retain(|s| s.id != server.id);
            self.servers.push(server);
        }
        self
    }

    /// The local repository directory, with `~` expanded.
    pub fn local_repository_path(&self) -> Result<PathBuf> {
        match &self.local_repository {
            Some(path) => Ok(expand(&path.to_string_lossy())),
            None => Ok(default_m2_dir()?.join("repository")),
        }
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

fn default_m2_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".m2"))
        .ok_or_else(|| ResolveError::configuration("Unable to determine home directory"))
}
