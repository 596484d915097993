//! Bridge configuration
//!
//! Handles the client proxy's endpoint and deadlines and the server adapter's
//! listener address. Stored as `bridge.json` in a data directory, with
//! environment overrides applied on top.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::constants::{defaults, env};

/// Client proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the plugin process (e.g. "http://127.0.0.1:50051")
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Deadline attached to every call, in milliseconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
    /// Deadline for establishing the connection, in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
}

fn default_base_url() -> String {
    defaults::BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    defaults::REQUEST_TIMEOUT_MS
}

fn default_connect_timeout() -> u64 {
    defaults::CONNECT_TIMEOUT_MS
}

impl ClientConfig {
    /// Configuration for a plugin at `base_url` with default deadlines
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the per-call deadline
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout(),
            connect_timeout_ms: default_connect_timeout(),
        }
    }
}

/// Server adapter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listener address; port 0 picks a free port
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_bind_addr() -> String {
    defaults::BIND_ADDR.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

/// Full bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BridgeConfig {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl BridgeConfig {
    /// Load configuration from disk, falling back to defaults if absent
    pub async fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = data_dir.join(defaults::CONFIG_FILE);

        if !config_path.exists() {
            log::debug!("No bridge config at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path).await?;

        serde_json::from_str(&contents).map_err(ConfigError::Parse)
    }

    /// Save configuration to disk
    pub async fn save(&self, data_dir: &Path) -> Result<(), ConfigError> {
        fs::create_dir_all(data_dir).await?;

        let config_path = data_dir.join(defaults::CONFIG_FILE);
        let contents = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        fs::write(&config_path, contents).await?;

        log::info!("Bridge configuration saved to {:?}", config_path);
        Ok(())
    }

    /// Apply `VENOMLAB_PLUGIN_URL` / `VENOMLAB_BIND_ADDR` if set
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(env::PLUGIN_URL).ok(),
            std::env::var(env::BIND_ADDR).ok(),
        )
    }

    fn with_overrides(mut self, base_url: Option<String>, bind_addr: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|s| !s.is_empty()) {
            log::info!("Plugin URL overridden from environment: {}", url);
            self.client.base_url = url;
        }
        if let Some(addr) = bind_addr.filter(|s| !s.is_empty()) {
            log::info!("Bind address overridden from environment: {}", addr);
            self.server.bind_addr = addr;
        }
        self
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(serde_json::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(serde_json::Error),
}
