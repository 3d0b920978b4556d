//! Application configuration (§10.1).

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub scheduling: SchedulingConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// The §4.4 scheduling window and slot defaults.
#[derive(Debug, Deserialize, Clone)]
pub struct SchedulingConfig {
    pub window_days: i64,
    pub rotation_slots: Vec<String>,
    pub core_per_day_cap: u32,
}

/// The C7/C8 upstream client and background worker defaults (§4.6/§4.7).
#[derive(Debug, Deserialize, Clone)]
pub struct SyncConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub request_timeout_seconds: u64,
    pub session_refresh_interval_seconds: u64,
    pub local_utc_offset_hours: i8,
    pub poll_interval_seconds: u64,
    pub batch_size: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Loaded in this order (later sources override earlier ones):
    /// 1. config/default.toml (required)
    /// 2. custom config file (if path provided)
    /// 3. config/dev.toml (optional, for local development)
    /// 4. environment variables (prefix `SCHEDCORE__`, `__` nesting separator)
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigLoader::builder().add_source(File::with_name("config/default"));

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path));
        }

        builder = builder.add_source(File::with_name("config/dev").required(false));

        let config = builder
            .add_source(Environment::with_prefix("SCHEDCORE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
