//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/geomarks/config.toml

pub mod defaults;

use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Default values for searches
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream API settings
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Rate limiter settings
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Location settings
    #[serde(default)]
    pub location: LocationConfig,
}

/// Default values for searches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default search radius in meters
    #[serde(default = "default_radius")]
    pub radius: f64,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,

    /// Default zoom level for locate
    #[serde(default = "default_zoom")]
    pub zoom: f64,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Upstream API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// MediaWiki action API endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// User-Agent header sent upstream
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

/// Rate limiter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests admitted per client per window
    #[serde(default = "default_rate_limit_max")]
    pub max_per_window: u32,

    /// Window length in seconds
    #[serde(default = "default_rate_limit_window")]
    pub window_secs: u64,

    /// Key clients by the X-Forwarded-For header instead of the peer
    /// address. Only enable behind a trusted reverse proxy.
    #[serde(default)]
    pub trust_forwarded: bool,
}

/// Location settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocationConfig {
    /// If true, `search` without a location uses the device position
    #[serde(default)]
    pub default_here: bool,
}

// Default value functions for serde
fn default_radius() -> f64 {
    DEFAULT_RADIUS
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
fn default_zoom() -> f64 {
    DEFAULT_ZOOM
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_upstream_timeout() -> u64 {
    DEFAULT_UPSTREAM_TIMEOUT_SECS
}
fn default_rate_limit_max() -> u32 {
    DEFAULT_RATE_LIMIT_MAX
}
fn default_rate_limit_window() -> u64 {
    DEFAULT_RATE_LIMIT_WINDOW_SECS
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            format: default_format(),
            zoom: default_zoom(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_upstream_timeout(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_per_window: default_rate_limit_max(),
            window_secs: default_rate_limit_window(),
            trust_forwarded: false,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("failed to parse config file: {}", e)))
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("failed to create config directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;

        fs::write(&path, content)
            .map_err(|e| Error::Config(format!("failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["defaults", "radius"] => Some(self.defaults.radius.to_string()),
            ["defaults", "format"] => Some(self.defaults.format.clone()),
            ["defaults", "zoom"] => Some(self.defaults.zoom.to_string()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["upstream", "api_url"] => Some(self.upstream.api_url.clone()),
            ["upstream", "user_agent"] => Some(self.upstream.user_agent.clone()),
            ["upstream", "timeout_secs"] => Some(self.upstream.timeout_secs.to_string()),

            ["rate_limit", "max_per_window"] => Some(self.rate_limit.max_per_window.to_string()),
            ["rate_limit", "window_secs"] => Some(self.rate_limit.window_secs.to_string()),
            ["rate_limit", "trust_forwarded"] => Some(self.rate_limit.trust_forwarded.to_string()),

            ["location", "default_here"] => Some(self.location.default_here.to_string()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["defaults", "radius"] => {
                self.defaults.radius = value
                    .parse()
                    .map_err(|_| Error::Config(format!("invalid radius value: {}", value)))?;
            }
            ["defaults", "format"] => {
                self.defaults.format = value.to_string();
            }
            ["defaults", "zoom"] => {
                self.defaults.zoom = value
                    .parse()
                    .map_err(|_| Error::Config(format!("invalid zoom value: {}", value)))?;
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value
                    .parse()
                    .map_err(|_| Error::Config(format!("invalid port value: {}", value)))?;
            }

            ["upstream", "api_url"] => {
                self.upstream.api_url = value.to_string();
            }
            ["upstream", "user_agent"] => {
                self.upstream.user_agent = value.to_string();
            }
            ["upstream", "timeout_secs"] => {
                self.upstream.timeout_secs = value
                    .parse()
                    .map_err(|_| Error::Config(format!("invalid timeout value: {}", value)))?;
            }

            ["rate_limit", "max_per_window"] => {
                self.rate_limit.max_per_window = value
                    .parse()
                    .map_err(|_| Error::Config(format!("invalid limit value: {}", value)))?;
            }
            ["rate_limit", "window_secs"] => {
                self.rate_limit.window_secs = value
                    .parse()
                    .map_err(|_| Error::Config(format!("invalid window value: {}", value)))?;
            }
            ["rate_limit", "trust_forwarded"] => {
                self.rate_limit.trust_forwarded = value
                    .parse()
                    .map_err(|_| Error::Config(format!("invalid boolean value: {}", value)))?;
            }

            ["location", "default_here"] => {
                self.location.default_here = value
                    .parse()
                    .map_err(|_| Error::Config(format!("invalid boolean value: {}", value)))?;
            }

            _ => {
                return Err(Error::Config(format!("unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "defaults.radius",
            "defaults.format",
            "defaults.zoom",
            "server.host",
            "server.port",
            "upstream.api_url",
            "upstream.user_agent",
            "upstream.timeout_secs",
            "rate_limit.max_per_window",
            "rate_limit.window_secs",
            "rate_limit.trust_forwarded",
            "location.default_here",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
