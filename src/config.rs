use std::fs;
use std::path::Path;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::LogLevel;

pub const DEFAULT_CONFIG_PATH: &str = "hypetracker.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Tracker configuration. Anonymous read-only access needs no secrets, so a
/// missing file just means defaults; every field is individually optional in
/// the TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Secure WebSocket gateway for the chat protocol.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_channel")]
    pub channel: String,
    /// Anonymous login nick; randomized per run unless pinned in the file.
    #[serde(default = "default_nickname")]
    pub nickname: String,
    #[serde(default = "default_store_capacity")]
    pub store_capacity: usize,
    #[serde(default = "default_metrics_window")]
    pub metrics_window: usize,
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
    #[serde(default = "default_auth_settle_ms")]
    pub auth_settle_ms: u64,
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_server_url() -> String {
    "wss://irc-ws.chat.twitch.tv:443".to_string()
}

fn default_channel() -> String {
    "ninja".to_string()
}

fn default_nickname() -> String {
    // The anonymous viewer convention: justinfan plus a few digits.
    let mut rng = rand::thread_rng();
    format!("justinfan{}", rng.gen_range(10_000..100_000))
}

fn default_store_capacity() -> usize {
    crate::hype::store::DEFAULT_CAPACITY
}

fn default_metrics_window() -> usize {
    crate::hype::metrics::DEFAULT_WINDOW
}

fn default_idle_timeout_secs() -> u64 {
    300
}

fn default_reconnect_delay_secs() -> u64 {
    5
}

fn default_auth_settle_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            channel: default_channel(),
            nickname: default_nickname(),
            store_capacity: default_store_capacity(),
            metrics_window: default_metrics_window(),
            idle_timeout_secs: default_idle_timeout_secs(),
            reconnect_delay_secs: default_reconnect_delay_secs(),
            auth_settle_ms: default_auth_settle_ms(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Loads the config file if present, defaults otherwise.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Ok(toml::from_str(&fs::read_to_string(path)?)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        fs::write(path, toml::to_string(self)?)?;
        Ok(())
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }

    pub fn auth_settle(&self) -> Duration {
        Duration::from_millis(self.auth_settle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load("definitely-not-a-real-file.toml").unwrap();
        assert_eq!(config.store_capacity, 1000);
        assert_eq!(config.metrics_window, 50);
        assert_eq!(config.reconnect_delay_secs, 5);
        assert_eq!(config.idle_timeout_secs, 300);
        assert!(config.nickname.starts_with("justinfan"));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str("channel = \"somestreamer\"").unwrap();
        assert_eq!(config.channel, "somestreamer");
        assert_eq!(config.store_capacity, 1000);
        assert!(config.server_url.starts_with("wss://"));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let back: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(back.channel, config.channel);
        assert_eq!(back.nickname, config.nickname);
    }
}
