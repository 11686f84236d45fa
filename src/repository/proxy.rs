//! Proxy and credential selection from resolver settings.
//!
//! [`ProxySelector`] picks the first active proxy whose protocol matches the repository's
//! URL scheme, unless the repository host is listed in the proxy's `non_proxy_hosts`
//! (`|`-separated, `*` wildcard, case-insensitive, e.g. `*.corp|localhost`).
//!
//! [`AuthenticationSelector`] hands out server credentials whose id equals the repository id.

use super::{Authentication, Proxy, RemoteRepository, Secret};
use crate::core::{ResolveError, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const fn default_active() -> bool {
    true
}

fn default_protocol() -> String {
    "http".to_string()
}

const fn default_port() -> u16 {
    8080
}

/// A proxy entry from the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySettings {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<Secret>,
    #[serde(default)]
    pub non_proxy_hosts: Option<String>,
}

impl ProxySettings {
    fn to_proxy(&self) -> Proxy {
        let authentication = self.username.as_ref().map(|username| Authentication {
            username: Some(username.clone()),
            password: self.password.clone(),
            ..Authentication::default()
        });
        Proxy {
            proxy_type: self.protocol.to_ascii_lowercase(),
            host: self.host.clone(),
            port: self.port,
            authentication,
        }
    }
}

/// Credentials for a repository id, from the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<Secret>,
    #[serde(default)]
    pub private_key: Option<PathBuf>,
    #[serde(default)]
    pub passphrase: Option<Secret>,
}

impl ServerSettings {
    fn to_authentication(&self) -> Authentication {
        Authentication {
            username: self.username.clone(),
            password: self.password.clone(),
            private_key_file: self.private_key.clone(),
            passphrase: self.passphrase.clone(),
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledProxy {
    settings: ProxySettings,
    non_proxy_hosts: Option<Regex>,
}

/// Chooses a proxy for each repository.
#[derive(Debug, Clone, Default)]
pub struct ProxySelector {
    proxies: Vec<CompiledProxy>,
}

impl ProxySelector {
    /// Compile the active proxies.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::ConfigurationError`] if a `non_proxy_hosts` pattern cannot be
    /// compiled.
    pub fn new(proxies: &[ProxySettings]) -> Result<Self> {
        let proxies = proxies
            .iter()
            .filter(|p| p.active)
            .map(|settings| {
                let non_proxy_hosts = settings
                    .non_proxy_hosts
                    .as_deref()
                    .filter(|hosts| !hosts.trim().is_empty())
                    .map(compile_host_pattern)
                    .transpose()?;
                Ok(CompiledProxy {
                    settings: settings.clone(),
                    non_proxy_hosts,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { proxies })
    }

    /// The proxy to reach `repository` through, if any.
    pub fn select(&self, repository: &RemoteRepository) -> Option<Proxy> {
        let protocol = repository.protocol();
        let host = repository.host().unwrap_or_default();
        self.proxies
            .iter()
            .find(|p| {
                p.settings.protocol.eq_ignore_ascii_case(&protocol)
                    && !p.non_proxy_hosts.as_ref().is_some_and(|re| re.is_match(&host))
            })
            .map(|p| p.settings.to_proxy())
    }
}

fn compile_host_pattern(hosts: &str) -> Result<Regex> {
    let alternatives: Vec<String> = hosts
        .split(['|', ','])
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map(|host| regex::escape(host).replace(r"\*", ".*"))
        .collect();
    RegexBuilder::new(&format!("^(?:{})$", alternatives.join("|")))
        .case_insensitive(true)
        .build()
        .map_err(|e| ResolveError::configuration(format!("invalid non-proxy hosts '{hosts}': {e}")))
}

/// Chooses credentials for each repository by id.
#[derive(Debug, Clone, Default)]
pub struct AuthenticationSelector {
    servers: Vec<ServerSettings>,
}

impl AuthenticationSelector {
    pub fn new(servers: &[ServerSettings]) -> Self {
        Self {
            servers: servers.to_vec(),
        }
    }

    pub fn select(&self, repository: &RemoteRepository) -> Option<Authentication> {
        self.servers
            .iter()
            .find(|server| server.id == repository.id)
            .map(ServerSettings::to_authentication)
    }
}
