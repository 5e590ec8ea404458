//! Client configuration loading

use anyhow::{Context, Result};
use redfin_http::{Verify, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Connection settings for one Redfish service
#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the service, e.g. `https://bmc.example.com`
    pub base_url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Path of the service root
    #[serde(default = "default_root_prefix")]
    pub root_prefix: String,
    /// `true`, `false` or a path to CA material
    #[serde(default)]
    pub verify: Verify,
    /// Language of the message registries to load
    #[serde(default = "default_language")]
    pub language: String,
    /// Request timeout of the default connectors
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Directory of standard registries replacing the embedded set
    #[serde(default)]
    pub registries_dir: Option<PathBuf>,
}

fn default_root_prefix() -> String {
    "/redfish/v1/".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            username: None,
            password: None,
            root_prefix: default_root_prefix(),
            verify: Verify::default(),
            language: default_language(),
            timeout_secs: default_timeout(),
            registries_dir: None,
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether a username or password was given
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() || self.password.is_some()
    }
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("root_prefix", &self.root_prefix)
            .field("verify", &self.verify)
            .field("language", &self.language)
            .field("timeout_secs", &self.timeout_secs)
            .field("registries_dir", &self.registries_dir)
            .finish()
    }
}

/// Load a service configuration from a TOML file
pub fn load_config(path: &Path) -> Result<ServiceConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration {}", path.display()))?;
    let config: ServiceConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse configuration {}", path.display()))?;
    info!(path = %path.display(), base_url = %config.base_url, "Loaded configuration");
    Ok(config)
}

/// Write a configuration to a TOML file
pub fn save_config(config: &ServiceConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write configuration {}", path.display()))?;
    Ok(())
}
