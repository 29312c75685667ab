//! Client configuration.
//!
//! Sources are layered in this order, later ones winning:
//! 1. built-in defaults
//! 2. `products.toml` in the working directory (optional)
//! 3. environment variables prefixed `PRODUCTS_` (e.g. `PRODUCTS_BASE_URL`)

use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_LEVEL: &str = "info";
const CONFIG_FILE: &str = "products";
const ENV_PREFIX: &str = "PRODUCTS";

/// Everything needed to construct a transport and a client.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,

    /// Whole-request timeout. There is no automatic retry.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra headers sent with every request.
    #[serde(default)]
    pub headers: Vec<(String, String)>,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_json: bool,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            headers: Vec::new(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Load from defaults, the optional config file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?
            .set_default("log_json", false)?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let loaded: ClientConfig = config.try_deserialize()?;
        loaded.validate()?;
        debug!(
            base_url = %loaded.base_url,
            timeout_secs = loaded.timeout_secs,
            "loaded client config"
        );
        Ok(loaded)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if url.starts_with("http://") || url.starts_with("https://") {
            Ok(())
        } else {
            Err(ConfigError::InvalidBaseUrl(self.base_url.clone()))
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
