//! TOML-based client configuration.
//!
//! Stored at `~/.config/chamada/config.toml` (platform equivalent via
//! `dirs`). Holds the backend base URL, the teacher identity used for
//! lesson listing and generation, and the polling cadence knobs.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

fn default_base_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_poll_interval_secs() -> u64 {
    3
}

fn default_idle_suspend_secs() -> u64 {
    5 * 60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Teacher whose lessons this client manages.
    #[serde(default)]
    pub teacher_id: Option<i64>,
    /// Seconds between scan-event log fetches while a lesson is open.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Seconds of zero-event inactivity before polling suspends.
    #[serde(default = "default_idle_suspend_secs")]
    pub idle_suspend_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            teacher_id: None,
            poll_interval_secs: default_poll_interval_secs(),
            idle_suspend_secs: default_idle_suspend_secs(),
        }
    }
}

impl Config {
    /// Default configuration file path.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("chamada").join("config.toml"))
    }

    /// Load from the default path; missing file yields the defaults.
    pub fn load_or_default() -> Self {
        match Self::path() {
            Ok(path) if path.exists() => Self::load_from(&path).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Persist to the default path, creating parent directories as needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_err = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_err(e.to_string()))?;
        }
        let raw = toml::to_string_pretty(self).map_err(|e| save_err(e.to_string()))?;
        std::fs::write(path, raw).map_err(|e| save_err(e.to_string()))
    }
}
