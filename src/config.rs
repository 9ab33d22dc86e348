//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::ApiConfig;
use crate::session::StoreConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub sessions: SessionsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Debug mode: verbose logging
    #[serde(default)]
    pub debug: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8050
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024 // 20 MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            debug: false,
        }
    }
}

/// Session store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionsConfig {
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_max_sessions() -> usize {
    256
}

fn default_idle_timeout() -> u64 {
    3600
}

fn default_sweep_interval() -> u64 {
    60
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            idle_timeout_secs: default_idle_timeout(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// Runs before logging is set up, so the outcome is returned for the
    /// caller to log with [`ConfigSource::log`].
    pub fn load_default() -> (Self, ConfigSource) {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("chartdeck").join("config.toml")),
            Some(PathBuf::from("/etc/chartdeck/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first readable file among `paths`, else defaults
    pub fn load_first(paths: &[PathBuf]) -> (Self, ConfigSource) {
        let mut source = ConfigSource::default();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    source.path = Some(path.clone());
                    return (config, source);
                }
                Err(e) => source.failures.push(e),
            }
        }

        (Self::from_env(), source)
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Server overrides
        if let Some(host) = lookup("CHARTDECK_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("CHARTDECK_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(max) = lookup("CHARTDECK_MAX_UPLOAD_BYTES").and_then(|m| m.parse().ok()) {
            self.server.max_upload_bytes = max;
        }
        if let Some(debug) = lookup("CHARTDECK_DEBUG") {
            self.server.debug = debug.to_lowercase() != "false" && debug != "0";
        }

        // Session overrides
        if let Some(max) = lookup("CHARTDECK_MAX_SESSIONS").and_then(|m| m.parse().ok()) {
            self.sessions.max_sessions = max;
        }

        // Logging overrides
        if let Some(level) = lookup("CHARTDECK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("CHARTDECK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Effective log filter: debug mode raises the default level
    pub fn log_filter(&self) -> String {
        let level = if self.server.debug && self.logging.level == default_log_level() {
            "debug"
        } else {
            self.logging.level.as_str()
        };
        format!("chartdeck={},tower_http={}", level, level)
    }

    /// API server settings derived from this config
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            host: self.server.host.clone(),
            port: self.server.port,
            max_body_size: self.server.max_upload_bytes,
        }
    }

    /// Session store settings derived from this config
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            max_sessions: self.sessions.max_sessions,
            idle_timeout: Duration::from_secs(self.sessions.idle_timeout_secs),
            sweep_interval: Duration::from_secs(self.sessions.sweep_interval_secs.max(1)),
        }
    }
}

/// Where the effective configuration came from
#[derive(Debug, Default)]
pub struct ConfigSource {
    /// File that was loaded, `None` when running on defaults
    pub path: Option<PathBuf>,
    /// Files that existed but could not be loaded
    pub failures: Vec<ConfigError>,
}

impl ConfigSource {
    pub fn log(&self) {
        for failure in &self.failures {
            tracing::warn!(error = %failure, "Skipped config file");
        }

        match &self.path {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Chartdeck Configuration
#
# Environment variables override these settings:
# - CHARTDECK_HOST
# - CHARTDECK_PORT
# - CHARTDECK_MAX_UPLOAD_BYTES
# - CHARTDECK_DEBUG
# - CHARTDECK_MAX_SESSIONS
# - CHARTDECK_LOG_LEVEL
# - CHARTDECK_LOG_FORMAT

[server]
# Dashboard host
host = "127.0.0.1"

# Dashboard port
port = 8050

# Largest accepted request body (bytes); uploads arrive base64-encoded
max_upload_bytes = 20971520

# Debug mode: log at debug level unless a level is set below
debug = false

[sessions]
# Maximum number of open dashboard tabs
max_sessions = 256

# Drop a session after this many idle seconds
idle_timeout_secs = 3600

# How often to look for idle sessions (seconds)
sweep_interval_secs = 60

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
