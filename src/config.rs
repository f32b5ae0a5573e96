//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::status::{ProbeStrategy, Target, DEFAULT_PROBE_TIMEOUT_MS};
use crate::transit::{DEFAULT_HISTORY_LIMIT, DEFAULT_TRANSIT_URL};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub status: StatusConfig,

    #[serde(default)]
    pub transit: TransitConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8086
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Longest time a request may take before it is answered with 408
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Status tracking configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StatusConfig {
    #[serde(default = "default_probe_timeout")]
    pub timeout_ms: u64,

    /// 0 disables the periodic refresh
    #[serde(default)]
    pub refresh_interval_secs: u64,

    #[serde(default = "default_targets")]
    pub targets: Vec<Target>,
}

fn default_probe_timeout() -> u64 {
    DEFAULT_PROBE_TIMEOUT_MS
}

fn default_targets() -> Vec<Target> {
    vec![
        Target::new(
            "ETH Mensa",
            "https://idapps.ethz.ch/cookpit-pub-services/v1/weeklyrotas?client-id=ethz-wcms&lang=de&rs-first=0&rs-size=1",
        )
        .strategy(ProbeStrategy::WeeklyJson),
        Target::new("GitHub API", "https://api.github.com"),
        Target::new("JSONPlaceholder", "https://jsonplaceholder.typicode.com"),
        Target::new("OpenWeather", "https://api.openweathermap.org"),
    ]
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_probe_timeout(),
            refresh_interval_secs: 0,
            targets: default_targets(),
        }
    }
}

impl StatusConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Refresh interval, `None` when periodic refresh is disabled
    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_interval_secs > 0).then(|| Duration::from_secs(self.refresh_interval_secs))
    }
}

/// Transit API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TransitConfig {
    #[serde(default = "default_transit_url")]
    pub base_url: String,

    #[serde(default = "default_transit_limit")]
    pub default_limit: u32,

    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    #[serde(default = "default_transit_timeout")]
    pub request_timeout_secs: u64,
}

fn default_transit_url() -> String {
    DEFAULT_TRANSIT_URL.to_string()
}

fn default_transit_limit() -> u32 {
    10
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_transit_timeout() -> u64 {
    15
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self {
            base_url: default_transit_url(),
            default_limit: default_transit_limit(),
            history_limit: default_history_limit(),
            request_timeout_secs: default_transit_timeout(),
        }
    }
}

impl TransitConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Local state storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("statusboard").to_string_lossy().to_string())
        .unwrap_or_else(|| "./statusboard_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
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

    pub file: Option<String>,
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
            file: None,
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

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
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
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("statusboard").join("config.toml")),
            Some(PathBuf::from("/etc/statusboard/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Load an explicit path if given, otherwise search the default locations
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::load_default()),
        }
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Storage overrides
        if let Some(data_dir) = lookup("STATUSBOARD_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        // API overrides
        if let Some(host) = lookup("STATUSBOARD_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("STATUSBOARD_API_PORT").and_then(|p| p.parse().ok()) {
            self.api.port = port;
        }

        // Status overrides
        if let Some(ms) = lookup("STATUSBOARD_PROBE_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            self.status.timeout_ms = ms;
        }
        if let Some(secs) = lookup("STATUSBOARD_REFRESH_INTERVAL_SECS").and_then(|v| v.parse().ok())
        {
            self.status.refresh_interval_secs = secs;
        }

        // Transit overrides
        if let Some(url) = lookup("STATUSBOARD_TRANSIT_URL") {
            self.transit.base_url = url;
        }

        // Logging overrides
        if let Some(level) = lookup("STATUSBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("STATUSBOARD_LOG_FORMAT") {
            self.logging.format = format;
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
    r#"# Statusboard Configuration
#
# Environment variables override these settings:
# - STATUSBOARD_DATA_DIR
# - STATUSBOARD_API_HOST
# - STATUSBOARD_API_PORT
# - STATUSBOARD_PROBE_TIMEOUT_MS
# - STATUSBOARD_REFRESH_INTERVAL_SECS
# - STATUSBOARD_TRANSIT_URL
# - STATUSBOARD_LOG_LEVEL
# - STATUSBOARD_LOG_FORMAT

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8086

# Allowed CORS origins (empty = any)
cors_origins = []

# Request timeout in seconds, slow requests get 408
# (keep above status.timeout_ms so a refresh can finish)
request_timeout_secs = 30

[status]
# Per-probe timeout (ms)
timeout_ms = 10000

# Periodic refresh interval (seconds, 0 = only on demand)
refresh_interval_secs = 0

# strategy: "reachability" (HEAD) or "weekly-json" (GET + JSON check with
# valid-after / valid-before set to the current Monday-to-Monday window)
[[status.targets]]
name = "ETH Mensa"
url = "https://idapps.ethz.ch/cookpit-pub-services/v1/weeklyrotas?client-id=ethz-wcms&lang=de&rs-first=0&rs-size=1"
strategy = "weekly-json"

[[status.targets]]
name = "GitHub API"
url = "https://api.github.com"

[[status.targets]]
name = "JSONPlaceholder"
url = "https://jsonplaceholder.typicode.com"

[[status.targets]]
name = "OpenWeather"
url = "https://api.openweathermap.org"

[transit]
# Transport API base URL
base_url = "https://transport.opendata.ch/v1"

# Connections returned per search
default_limit = 10

# Searches kept in history
history_limit = 10

# Request timeout in seconds
request_timeout_secs = 15

[storage]
# Directory for local state (search history)
data_dir = "~/.local/share/statusboard"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/statusboard/statusboard.log"
"#
    .to_string()
}
