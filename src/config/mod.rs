//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/pk-search/config.toml

pub mod defaults;

use crate::constants::api::{FEATURE_SERVICE_URL, NOMINATIM_URL, REVERSE_ZOOM, USER_AGENT};
use crate::error::{Error, Result};
use crate::geo::retry::RetryPolicy;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote service endpoints
    #[serde(default)]
    pub services: ServicesConfig,

    /// Reverse geocoding behaviour
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Remote service endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Feature service query endpoint
    #[serde(default = "default_feature_url")]
    pub feature_url: String,

    /// Nominatim base URL (without the /reverse path)
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Reverse geocoding behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Attempts per item before falling back to the unknown placeholder
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed delay between attempts in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Nominatim zoom level
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,

    /// Map link template with {lat} and {lng} placeholders
    #[serde(default = "default_map_link")]
    pub map_link: String,
}

// Default value functions for serde
fn default_feature_url() -> String {
    FEATURE_SERVICE_URL.to_string()
}
fn default_nominatim_url() -> String {
    NOMINATIM_URL.to_string()
}
fn default_user_agent() -> String {
    USER_AGENT.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}
fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}
fn default_zoom() -> u8 {
    REVERSE_ZOOM
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
fn default_map_link() -> String {
    DEFAULT_MAP_LINK.to_string()
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            feature_url: default_feature_url(),
            nominatim_url: default_nominatim_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            delay_ms: default_delay_ms(),
            zoom: default_zoom(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            map_link: default_map_link(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["services", "feature_url"] => Some(self.services.feature_url.clone()),
            ["services", "nominatim_url"] => Some(self.services.nominatim_url.clone()),
            ["services", "user_agent"] => Some(self.services.user_agent.clone()),
            ["services", "timeout_secs"] => Some(self.services.timeout_secs.to_string()),

            ["geocoder", "max_retries"] => Some(self.geocoder.max_retries.to_string()),
            ["geocoder", "delay_ms"] => Some(self.geocoder.delay_ms.to_string()),
            ["geocoder", "zoom"] => Some(self.geocoder.zoom.to_string()),

            ["output", "format"] => Some(self.output.format.clone()),
            ["output", "map_link"] => Some(self.output.map_link.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["services", "feature_url"] => {
                self.services.feature_url = value.to_string();
            }
            ["services", "nominatim_url"] => {
                self.services.nominatim_url = value.to_string();
            }
            ["services", "user_agent"] => {
                self.services.user_agent = value.to_string();
            }
            ["services", "timeout_secs"] => {
                self.services.timeout_secs = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid timeout value: {}", value))
                })?;
            }

            ["geocoder", "max_retries"] => {
                self.geocoder.max_retries = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid retry count: {}", value))
                })?;
            }
            ["geocoder", "delay_ms"] => {
                self.geocoder.delay_ms = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid delay value: {}", value))
                })?;
            }
            ["geocoder", "zoom"] => {
                self.geocoder.zoom = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid zoom value: {}", value))
                })?;
            }

            ["output", "format"] => {
                self.output.format = value.to_string();
            }
            ["output", "map_link"] => {
                if !value.contains("{lat}") || !value.contains("{lng}") {
                    return Err(Error::Config(
                        "Map link template needs {lat} and {lng} placeholders".to_string(),
                    ));
                }
                self.output.map_link = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "services.feature_url",
            "services.nominatim_url",
            "services.user_agent",
            "services.timeout_secs",
            "geocoder.max_retries",
            "geocoder.delay_ms",
            "geocoder.zoom",
            "output.format",
            "output.map_link",
        ]
    }

    /// Retry policy for reverse geocoding
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.geocoder.max_retries,
            delay: Duration::from_millis(self.geocoder.delay_ms),
        }
    }

    /// Request timeout for both services
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.services.timeout_secs)
    }
}
