//! Runtime configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Game configuration. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// JSON file holding user profiles.
    #[serde(default = "default_users_file")]
    users_file: PathBuf,

    /// Base URL of the remote card service.
    #[serde(default = "default_card_api_url")]
    card_api_url: String,

    /// Cards dealt per session.
    #[serde(default = "default_hand_size")]
    hand_size: usize,

    /// Timeout for a remote deal, in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    fetch_timeout_secs: u64,

    /// Skip the remote card service and deal locally.
    #[serde(default)]
    offline: bool,
}

fn default_users_file() -> PathBuf {
    PathBuf::from("users.json")
}

fn default_card_api_url() -> String {
    "https://www.random.org/playing-cards/".to_string()
}

fn default_hand_size() -> usize {
    5
}

fn default_fetch_timeout_secs() -> u64 {
    5
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            users_file: default_users_file(),
            card_api_url: default_card_api_url(),
            hand_size: default_hand_size(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            offline: false,
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(users_file = %config.users_file.display(), offline = config.offline, "Config loaded");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but is invalid.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Remote fetch timeout.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Overrides the users file.
    pub fn with_users_file(mut self, users_file: PathBuf) -> Self {
        self.users_file = users_file;
        self
    }

    /// Overrides offline mode.
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: GameConfig = toml::from_str("").expect("Parse failed");
        assert_eq!(config, GameConfig::default());
        assert_eq!(*config.hand_size(), 5);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: GameConfig =
            toml::from_str("hand_size = 7\noffline = true\n").expect("Parse failed");
        assert_eq!(*config.hand_size(), 7);
        assert!(*config.offline());
        assert_eq!(config.users_file(), &PathBuf::from("users.json"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = GameConfig::load_or_default("definitely/not/here.toml").expect("Defaults");
        assert_eq!(config, GameConfig::default());
    }
}
