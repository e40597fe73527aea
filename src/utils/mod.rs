//! Utility module for TubeRemote
//!
//! This module provides common utilities used throughout the application:
//! - Error handling with custom error types
//! - Configuration management
//! - Display helpers shared by the history store and notices

pub mod config;
pub mod error;

// Re-export commonly used items
pub use config::{
    Config, GeneralConfig, HeadlessConfig, HistoryConfig, StorageConfig, MAX_HISTORY_BYTES, MAX_HISTORY_ENTRIES,
};
pub use error::{IntoRemoteError, RemoteError, Result};

/// Initialize the application configuration
///
/// Loads configuration from:
/// 1. Default values
/// 2. System configuration file
/// 3. User configuration file
/// 4. Environment variables
pub fn load_config() -> Result<Config> {
    Config::load()
}

/// Length of a string as the browser counts it (UTF-16 code units)
///
/// Persisted limits were defined against browser string lengths, so every
/// length check on references and timestamps goes through here.
pub fn display_len(value: &str) -> usize {
    value.encode_utf16().count()
}

/// Format a wall-clock time the way history entries display it,
/// e.g. `Oct 19, 2026, 03:04 PM`
pub fn format_timestamp<Tz>(time: &chrono::DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    time.format("%b %-d, %Y, %I:%M %p").to_string()
}
