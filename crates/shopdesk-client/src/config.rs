//! # Client Configuration
//!
//! Configuration for the resource store and the report tool.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SHOPDESK_API_URL=https://shop.example.com/api                      │
//! │     SHOPDESK_API_TOKEN=eyJhbGciOi...                                   │
//! │     SHOPDESK_TIMEOUT_SECS=10                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $SHOPDESK_CONFIG, or                                               │
//! │     ~/.config/shopdesk/client.toml (Linux)                             │
//! │     ~/Library/Application Support/com.shopdesk.shopdesk/client.toml    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:5000/api, 30s timeout, monthly reports            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # client.toml
//! [api]
//! base_url = "http://localhost:5000/api"
//! timeout_secs = 30
//! # token = "..."   # usually from SHOPDESK_API_TOKEN instead
//!
//! [reports]
//! default_period = "monthly"  # daily | weekly | monthly | all
//! dashboard_window_days = 30
//! ```

use serde::{Deserialize, Serialize};
use shopdesk_core::report::Period;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

/// Environment variable holding the API base URL.
pub const ENV_API_URL: &str = "SHOPDESK_API_URL";
/// Environment variable holding the bearer token.
pub const ENV_API_TOKEN: &str = "SHOPDESK_API_TOKEN";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "SHOPDESK_TIMEOUT_SECS";
/// Environment variable pointing at a config file.
pub const ENV_CONFIG_PATH: &str = "SHOPDESK_CONFIG";
/// Environment variable holding the default report period.
pub const ENV_REPORT_PERIOD: &str = "SHOPDESK_REPORT_PERIOD";

/// Default backend location.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

// =============================================================================
// API Settings
// =============================================================================

/// Where and how to reach the REST backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL; resource paths are appended (`{base_url}/products`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Bearer token for non-interactive use (the report tool).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            token: None,
        }
    }
}

// =============================================================================
// Report Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Period used when none is requested.
    #[serde(default)]
    pub default_period: Period,

    /// Length of the dashboard's current window.
    #[serde(default = "default_dashboard_window_days")]
    pub dashboard_window_days: u32,
}

fn default_dashboard_window_days() -> u32 {
    30
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            default_period: Period::default(),
            dashboard_window_days: default_dashboard_window_days(),
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub reports: ReportSettings,
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document; missing keys take their defaults.
    pub fn from_toml(contents: &str) -> ClientResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = &self.api.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidConfig(format!(
                "API URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.reports.dashboard_window_days == 0 {
            return Err(ClientError::InvalidConfig(
                "dashboard_window_days must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies overrides from a variable lookup (the process environment in
    /// [`ClientConfig::load`]).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(token) = lookup(ENV_API_TOKEN) {
            debug!("Overriding API token from environment");
            self.api.token = Some(token).filter(|t| !t.trim().is_empty());
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid timeout in environment"),
            }
        }

        if let Some(period) = lookup(ENV_REPORT_PERIOD) {
            match period.parse::<Period>() {
                Ok(parsed) => self.reports.default_period = parsed,
                Err(e) => warn!(error = %e, "Ignoring invalid report period in environment"),
            }
        }
    }

    /// Returns the config file path: `$SHOPDESK_CONFIG` or the platform
    /// config directory.
    fn default_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
            return Some(PathBuf::from(path));
        }
        directories::ProjectDirs::from("com", "shopdesk", "shopdesk")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }

    pub fn token(&self) -> Option<&str> {
        self.api.token.as_deref()
    }
}
