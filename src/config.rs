//! Client configuration.
//!
//! Configuration is an explicit value handed to the transport at
//! construction. It can be built in code, loaded from YAML, and optionally
//! overlaid with `OPENSHIFT_*` environment variables at load time.
//!
//! ```yaml
//! server_url: "https://openshift.redhat.com"
//! username: "dev@example.com"
//! password: "..."
//! timeout_ms: 180000
//! proxy:
//!   host: "proxy.internal"
//!   port: 3128
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_SERVER: &str = "OPENSHIFT_SERVER";
pub const ENV_USERNAME: &str = "OPENSHIFT_USERNAME";
pub const ENV_PASSWORD: &str = "OPENSHIFT_PASSWORD";
pub const ENV_TIMEOUT: &str = "OPENSHIFT_TIMEOUT";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// HTTP proxy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
}

/// Connection settings for the broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Broker base URL.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// REST API version requested through the Accept header.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Sent as User-Agent.
    #[serde(default = "default_client_id")]
    pub client_id: String,
    #[serde(default = "default_true")]
    pub verify_ssl: bool,
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,
}

fn default_server_url() -> String { "https://openshift.redhat.com".to_string() }
fn default_timeout_ms() -> u64 { 180_000 }
fn default_api_version() -> String { "1.6".to_string() }
fn default_client_id() -> String { "openshift-client-rs".to_string() }
fn default_true() -> bool { true }

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            username: None,
            password: None,
            timeout_ms: default_timeout_ms(),
            api_version: default_api_version(),
            client_id: default_client_id(),
            verify_ssl: true,
            proxy: None,
        }
    }
}

impl ClientConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Self::default()
        }
    }

    /// Builder-style credentials.
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Overlay values from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary lookup (the environment in production).
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(server) = lookup(ENV_SERVER) {
            self.server_url = server;
        }
        if let Some(user) = lookup(ENV_USERNAME) {
            self.username = Some(user);
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.password = Some(password);
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            self.timeout_ms = timeout.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TIMEOUT,
                value: timeout.clone(),
            })?;
        }
        Ok(self)
    }
}
