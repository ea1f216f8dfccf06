//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the tide-bot.toml file.
//! Every setting has a default matching the production Seattle deployment, so the
//! file is optional; it exists to point the bot at another station or at mock
//! endpoints.

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Default configuration file, looked up in the working directory
pub const CONFIG_FILE: &str = "tide-bot.toml";

/// Application configuration loaded from tide-bot.toml
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// NOAA station configuration
    pub station: StationConfig,
    /// NOAA data API query settings
    pub noaa: NoaaConfig,
    /// Twitter API endpoint settings
    pub twitter: TwitterConfig,
    /// Inbound HTTP listener
    pub server: ServerConfig,
}

/// NOAA tide station configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StationConfig {
    /// NOAA station ID (e.g., "9447130" for Seattle, WA)
    pub id: String,
    /// Place name used in the post header
    pub name: String,
    /// Application identifier NOAA asks API clients to send
    pub application: String,
}

/// Query parameters and transport settings for the NOAA data API
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NoaaConfig {
    pub base_url: String,
    /// Vertical datum for heights (MLLW = Mean Lower Low Water)
    pub datum: String,
    /// `lst_ldt` is local standard/daylight time at the station
    pub time_zone: String,
    pub units: String,
    /// `hilo` returns only the high and low extrema
    pub interval: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TwitterConfig {
    /// Base URL of the Twitter API (no trailing slash)
    pub api_base: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
}

impl Default for StationConfig {
    fn default() -> Self {
        StationConfig {
            id: "9447130".to_string(),
            name: "Seattle".to_string(),
            application: "seattletidedata".to_string(),
        }
    }
}

impl Default for NoaaConfig {
    fn default() -> Self {
        NoaaConfig {
            base_url: "https://tidesandcurrents.noaa.gov/api/datagetter".to_string(),
            datum: "MLLW".to_string(),
            time_zone: "lst_ldt".to_string(),
            units: "english".to_string(),
            interval: "hilo".to_string(),
            timeout_secs: 5,
        }
    }
}

impl Default for TwitterConfig {
    fn default() -> Self {
        TwitterConfig {
            api_base: "https://api.twitter.com".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

impl NoaaConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl TwitterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ServerConfig {
    /// Parse the configured listen address.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.listen_addr.parse()
    }
}

impl Config {
    /// Load configuration from tide-bot.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    log::info!(
                        "Loaded configuration for station: {} ({})",
                        config.station.name,
                        config.station.id
                    );
                    config
                }
                Err(e) => {
                    log::warn!("Invalid config file format in {}: {}", path.display(), e);
                    log::warn!("Using default configuration (Seattle, WA)");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config file found, using default configuration (Seattle, WA)");
                Self::default()
            }
        }
    }
}
