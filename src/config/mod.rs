//! Configuration management

use anyhow::{bail, Result};
use relay_types::DEFAULT_PINS;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL of the GPIO controller (RELAY_API_ENDPOINT)
    #[serde(default)]
    pub api_endpoint: Option<String>,

    /// Upper bound for every controller call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Relays seeded into the cache at startup
    #[serde(default = "default_pins")]
    pub pins: Vec<u32>,
}

fn default_port() -> u16 {
    5000
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_pins() -> Vec<u32> {
    DEFAULT_PINS.to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            api_endpoint: None,
            timeout_secs: default_timeout_secs(),
            pins: default_pins(),
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub fn get_config_dir() -> PathBuf {
    directories::ProjectDirs::from("org", "relay-dashboard", "relay-dashboard")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_dir())
}

pub fn load_config_from(config_dir: &Path) -> Result<Config> {
    let config = ::config::Config::builder()
        // Start with defaults
        .set_default("port", i64::from(default_port()))?
        // Load from config file if it exists
        .add_source(
            ::config::File::with_name(&config_dir.join("config").to_string_lossy())
                .required(false),
        )
        // Override with environment variables (RELAY_PORT, RELAY_API_ENDPOINT, RELAY_PINS=17,27)
        .add_source(
            ::config::Environment::with_prefix("RELAY")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("pins")
                .try_parsing(true),
        )
        .build()?;

    let config: Config = config.try_deserialize()?;
    if config.timeout_secs == 0 {
        bail!("timeout_secs must be at least 1 (RELAY_TIMEOUT_SECS)");
    }
    Ok(config)
}

/// Runtime-mutable base URL of the GPIO controller.
///
/// Seeded once from [`Config::api_endpoint`] and changed afterwards only
/// through [`EndpointConfig::set`]. Every controller call reads it first.
#[derive(Debug, Clone, Default)]
pub struct EndpointConfig {
    endpoint: Arc<RwLock<Option<String>>>,
}

impl EndpointConfig {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            endpoint: Arc::new(RwLock::new(normalize(initial))),
        }
    }

    pub async fn get(&self) -> Option<String> {
        self.endpoint.read().await.clone()
    }

    /// Replace the endpoint. An empty string clears it.
    pub async fn set(&self, endpoint: impl Into<String>) {
        let endpoint = normalize(Some(endpoint.into()));
        match &endpoint {
            Some(url) => tracing::info!("Relay controller endpoint set to {}", url),
            None => tracing::info!("Relay controller endpoint cleared"),
        }
        *self.endpoint.write().await = endpoint;
    }
}

fn normalize(endpoint: Option<String>) -> Option<String> {
    endpoint
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
}
