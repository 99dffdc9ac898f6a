//! Configuration loading
//!
//! Two layers:
//! 1. **SkipConfig**: runtime settings read fresh on every poll tick and event
//! 2. **TomlConfig**: bootstrap file (skip settings, logging, interval table path)
//!
//! Missing or broken config files never terminate the host. They log and fall
//! back to built-in defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Runtime auto-skip settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkipConfig {
    /// Master switch; starts/stops the polling timer
    pub enabled: bool,

    /// On-screen text shown when an intro is skipped (empty disables it)
    pub notification_text: String,

    /// Auto-skip the first episode of a season too
    pub skip_first_episode: bool,

    /// Seconds of the intro's tail left to play after the seek
    pub seconds_of_intro_to_play: i64,
}

impl Default for SkipConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            notification_text: "Intro skipped".to_string(),
            skip_first_episode: true,
            seconds_of_intro_to_play: 2,
        }
    }
}

impl SkipConfig {
    /// Notification text to send, if any
    pub fn notification(&self) -> Option<&str> {
        let text = self.notification_text.trim();
        if text.is_empty() {
            None
        } else {
            Some(self.notification_text.as_str())
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Interval table exported by the detection pipeline (JSON)
    pub intervals_path: Option<PathBuf>,

    /// Auto-skip settings
    pub skip: SkipConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    ///
    /// Errors if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!(
                    "Failed to load config file {}: {}. Using built-in defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Reject values no deployment could mean
    fn validate(&self) -> Result<()> {
        match self.logging.level.to_ascii_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(Error::Config(format!("Unknown log level '{}'", other))),
        }
    }
}
