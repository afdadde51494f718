// ⚙️ Application Configuration - read from the environment
//
// Variables are upper-cased field names: DATABASE_PATH, BIND_ADDR, LOG_LEVEL,
// RATE_LIMIT, RATE_LIMIT_PERIOD_SECS, CACHE_TTL_SECS, ENABLE_RATE_LIMIT,
// ENABLE_CACHE. A `.env` file is honoured when present.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// `tracing` filter directive, e.g. "info" or "hrms_lite=debug"
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Requests allowed per client per period
    #[serde(default = "default_rate_limit")]
    pub rate_limit: usize,

    #[serde(default = "default_rate_limit_period_secs")]
    pub rate_limit_period_secs: u64,

    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    #[serde(default)]
    pub enable_rate_limit: bool,

    #[serde(default)]
    pub enable_cache: bool,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("hrms.db")
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_rate_limit() -> usize {
    100
}

fn default_rate_limit_period_secs() -> u64 {
    60
}

fn default_cache_ttl_secs() -> u64 {
    300
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: default_database_path(),
            bind_addr: default_bind_addr(),
            log_level: default_log_level(),
            rate_limit: default_rate_limit(),
            rate_limit_period_secs: default_rate_limit_period_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            enable_rate_limit: false,
            enable_cache: false,
        }
    }
}

impl AppConfig {
    /// Load `.env` (if any), then the process environment
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        envy::from_env::<AppConfig>().context("Failed to read configuration from environment")
    }

    /// Build from explicit key/value pairs (upper-case keys)
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, AppConfig>(pairs).context("Invalid configuration")
    }

    pub fn rate_limit_period(&self) -> Duration {
        Duration::from_secs(self.rate_limit_period_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
