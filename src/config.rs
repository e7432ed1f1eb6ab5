//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Outcome of searching the default config locations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigReport {
    /// File the config was read from; `None` means defaults plus env
    pub source: Option<PathBuf>,
    /// Files that exist but could not be loaded, with the reason
    pub skipped: Vec<(PathBuf, String)>,
}

impl ConfigReport {
    pub fn log(&self) {
        for (path, reason) in &self.skipped {
            tracing::warn!("Failed to load config from {:?}: {}", path, reason);
        }
        match &self.source {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

/// Backend API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the CPA backend (e.g. "http://localhost:8000")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout applied to every request, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Credentials attached to outbound requests
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Persistent token file, checked before the session token
    #[serde(default = "default_token_file")]
    pub token_file: Option<PathBuf>,

    /// Token for the current session only
    #[serde(default)]
    pub session_token: Option<String>,

    #[serde(default)]
    pub preparer_id: Option<String>,

    /// Sent on state-mutating requests
    #[serde(default)]
    pub csrf_token: Option<String>,
}

fn default_token_file() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("cpa-dashboard").join("token"))
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
            session_token: None,
            preparer_id: None,
            csrf_token: None,
        }
    }
}

/// Controller behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_palette_debounce")]
    pub palette_debounce_ms: u64,

    /// Viewports at or below this width close the mobile nav on view switch
    #[serde(default = "default_mobile_breakpoint")]
    pub mobile_breakpoint_px: u32,

    /// Number of skeleton cards shown while a loader is in flight
    #[serde(default = "default_skeleton_count")]
    pub skeleton_count: usize,

    /// Viewport width reported by the in-memory page
    #[serde(default = "default_viewport_width")]
    pub viewport_width_px: u32,
}

fn default_palette_debounce() -> u64 {
    150
}

fn default_mobile_breakpoint() -> u32 {
    768
}

fn default_skeleton_count() -> usize {
    3
}

fn default_viewport_width() -> u32 {
    1280
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            palette_debounce_ms: default_palette_debounce(),
            mobile_breakpoint_px: default_mobile_breakpoint(),
            skeleton_count: default_skeleton_count(),
            viewport_width_px: default_viewport_width(),
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

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
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

    /// Load from default locations or environment, logging the outcome
    pub fn load_default() -> Self {
        let (config, report) = Self::locate();
        report.log();
        config
    }

    /// Load from default locations or environment without logging
    ///
    /// Used before a subscriber is installed; log the report afterwards.
    pub fn locate() -> (Self, ConfigReport) {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("cpa-dashboard").join("config.toml")),
            Some(PathBuf::from("/etc/cpa-dashboard/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::locate_in(&config_paths)
    }

    /// First file in `paths` that exists and parses, else env-only defaults
    pub fn locate_in(paths: &[PathBuf]) -> (Self, ConfigReport) {
        let mut report = ConfigReport::default();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    report.source = Some(path.clone());
                    return (config, report);
                }
                Err(e) => report.skipped.push((path.clone(), e.to_string())),
            }
        }

        (Self::from_env(), report)
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("CPA_DASHBOARD_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(timeout) = std::env::var("CPA_DASHBOARD_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.api.request_timeout_secs = t;
            }
        }

        if let Ok(token) = std::env::var("CPA_DASHBOARD_TOKEN") {
            self.auth.session_token = Some(token);
        }
        if let Ok(preparer) = std::env::var("CPA_DASHBOARD_PREPARER_ID") {
            self.auth.preparer_id = Some(preparer);
        }
        if let Ok(csrf) = std::env::var("CPA_DASHBOARD_CSRF_TOKEN") {
            self.auth.csrf_token = Some(csrf);
        }

        if let Ok(level) = std::env::var("CPA_DASHBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("CPA_DASHBOARD_LOG_FORMAT") {
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
    r#"# CPA Dashboard Configuration
#
# Environment variables override these settings:
# - CPA_DASHBOARD_API_URL
# - CPA_DASHBOARD_TIMEOUT_SECS
# - CPA_DASHBOARD_TOKEN
# - CPA_DASHBOARD_PREPARER_ID
# - CPA_DASHBOARD_CSRF_TOKEN
# - CPA_DASHBOARD_LOG_LEVEL
# - CPA_DASHBOARD_LOG_FORMAT

[api]
# CPA backend URL
base_url = "http://localhost:8000"

# Timeout for every request, in seconds
request_timeout_secs = 10

[auth]
# Persistent token file (checked before session_token)
# token_file = "~/.local/share/cpa-dashboard/token"

# Token for this session only
# session_token = ""

# Preparer id sent as X-Preparer-ID
# preparer_id = ""

# CSRF token sent on POST/PUT/PATCH/DELETE
# csrf_token = ""

[ui]
# Command palette input debounce (ms)
palette_debounce_ms = 150

# Close the mobile navigation on view switch at or below this width
mobile_breakpoint_px = 768

# Skeleton placeholders shown while loading
skeleton_count = 3

# Viewport width reported by the headless page
viewport_width_px = 1280

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
