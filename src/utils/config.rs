//! Configuration management for TubeRemote
//!
//! This module handles loading and managing application configuration
//! from config files and environment variables.

use crate::utils::error::{IntoRemoteError, RemoteError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Most history entries any configuration may keep
pub const MAX_HISTORY_ENTRIES: usize = 50;

/// Largest serialized history any configuration may keep
pub const MAX_HISTORY_BYTES: usize = 500_000;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Play history limits
    pub history: HistoryConfig,

    /// Durable storage settings
    pub storage: StorageConfig,

    /// Simulated widget used by the headless binary
    pub headless: HeadlessConfig,

    /// General application settings
    pub general: GeneralConfig,
}

/// Play history configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of entries kept, at most `MAX_HISTORY_ENTRIES`
    pub max_entries: usize,

    /// Maximum size of the serialized history in bytes, at most `MAX_HISTORY_BYTES`
    pub max_bytes: usize,

    /// Entries kept when the storage quota is exceeded
    pub quota_fallback_entries: usize,

    /// Title used when neither the caller nor the widget provides one
    pub fallback_title: String,
}

/// Durable storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding persisted records (platform data dir when unset)
    pub data_dir: Option<PathBuf>,

    /// Total bytes the store may hold across all keys
    pub quota_bytes: usize,
}

/// Headless widget configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessConfig {
    /// Simulated widget initialization time
    pub ready_delay_ms: u64,

    /// Quality tiers the simulated widget offers for every video
    pub quality_levels: Vec<String>,
}

/// General application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: MAX_HISTORY_ENTRIES,
            max_bytes: MAX_HISTORY_BYTES,
            quota_fallback_entries: 10,
            fallback_title: "YouTube Video".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            quota_bytes: 5 * 1024 * 1024,
        }
    }
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            ready_delay_ms: 250,
            quality_levels: vec![
                "hd1080".to_string(),
                "hd720".to_string(),
                "large".to_string(),
                "medium".to_string(),
                "small".to_string(),
                "tiny".to_string(),
                "auto".to_string(),
            ],
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from various sources
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default values
    /// 2. System config file (/etc/tuberemote/config.toml on Linux)
    /// 3. User config file (~/.config/tuberemote/config.toml on Linux)
    /// 4. Environment variables (TUBEREMOTE_* prefix)
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(system_path) = Self::system_config_path() {
            if system_path.exists() {
                config.merge_from_file(&system_path)?;
            }
        }

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                config.merge_from_file(&user_path)?;
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from an explicit file, then apply environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.merge_from_file(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Directory holding persisted records
    pub fn data_dir(&self) -> PathBuf {
        self.storage.data_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tuberemote")
        })
    }

    /// Merge configuration from a TOML file
    ///
    /// Sections and fields missing from the file keep their defaults.
    fn merge_from_file(&mut self, path: &Path) -> Result<()> {
        let contents = std::fs::read_to_string(path).config_err("Failed to read config file")?;
        *self = toml::from_str(&contents).config_err("Failed to parse config file")?;
        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(dir) = std::env::var("TUBEREMOTE_DATA_DIR") {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }

        if let Ok(quota) = std::env::var("TUBEREMOTE_STORAGE_QUOTA") {
            self.storage.quota_bytes = quota
                .parse()
                .map_err(|_| RemoteError::Config("Invalid TUBEREMOTE_STORAGE_QUOTA".to_string()))?;
        }

        if let Ok(max_entries) = std::env::var("TUBEREMOTE_HISTORY_MAX_ENTRIES") {
            self.history.max_entries = max_entries.parse().map_err(|_| {
                RemoteError::Config("Invalid TUBEREMOTE_HISTORY_MAX_ENTRIES".to_string())
            })?;
        }

        if let Ok(log_level) = std::env::var("TUBEREMOTE_LOG_LEVEL") {
            self.general.log_level = log_level;
        }

        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.history.max_entries == 0 {
            return Err(RemoteError::Config("history.max_entries must be non-zero".to_string()));
        }

        if self.history.max_entries > MAX_HISTORY_ENTRIES {
            return Err(RemoteError::Config(format!(
                "history.max_entries ({}) exceeds the limit of {}",
                self.history.max_entries, MAX_HISTORY_ENTRIES
            )));
        }

        if self.history.max_bytes > MAX_HISTORY_BYTES {
            return Err(RemoteError::Config(format!(
                "history.max_bytes ({}) exceeds the limit of {}",
                self.history.max_bytes, MAX_HISTORY_BYTES
            )));
        }

        if self.history.quota_fallback_entries > self.history.max_entries {
            return Err(RemoteError::Config(
                "history.quota_fallback_entries cannot exceed history.max_entries".to_string(),
            ));
        }

        if self.history.max_bytes > self.storage.quota_bytes {
            return Err(RemoteError::Config(format!(
                "history.max_bytes ({}) exceeds storage.quota_bytes ({})",
                self.history.max_bytes, self.storage.quota_bytes
            )));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.general.log_level.as_str()) {
            return Err(RemoteError::Config(format!(
                "Invalid log level '{}', must be one of: {:?}",
                self.general.log_level, valid_log_levels
            )));
        }

        Ok(())
    }

    /// Get system config file path
    fn system_config_path() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        return Some(PathBuf::from("/etc/tuberemote/config.toml"));

        #[cfg(target_os = "windows")]
        return std::env::var("PROGRAMDATA")
            .ok()
            .map(|p| PathBuf::from(p).join("TubeRemote").join("config.toml"));

        #[cfg(target_os = "macos")]
        return Some(PathBuf::from("/Library/Application Support/TubeRemote/config.toml"));

        #[allow(unreachable_code)]
        None
    }

    /// Get user config file path
    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tuberemote").join("config.toml"))
    }
}
