//! Error types for TubeRemote
//!
//! This module defines the error taxonomy shared by the validator, the
//! playback controller and the history store. We use thiserror for the
//! library error types and anyhow for application-level handling in the
//! binary.

use thiserror::Error;

use crate::storage::StorageError;

/// Main error type for TubeRemote
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Malformed or unsafe video reference
    #[error("Invalid video reference: {0}")]
    InvalidReference(String),

    /// Command issued before the embed widget signalled readiness
    #[error("Player not ready")]
    NotReady,

    /// The embed widget reported an error or failed a call
    #[error("Widget error: {0}")]
    Widget(String),

    /// Durable storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Persisted data failed structural validation
    #[error("Corrupt persisted state: {0}")]
    CorruptState(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("File error: {0}")]
    FileIO(#[from] std::io::Error),

    /// JSON encoding or decoding errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RemoteError {
    /// Create an invalid reference error, truncating the offending input
    /// so that crafted payloads do not flood the logs
    pub fn invalid_reference<S: AsRef<str>>(raw: S) -> Self {
        let raw = raw.as_ref();
        let shown: String = raw.chars().take(80).collect();
        if shown.len() < raw.len() {
            RemoteError::InvalidReference(format!("{}...", shown))
        } else {
            RemoteError::InvalidReference(shown)
        }
    }

    /// Whether this error should be shown to the user rather than only logged
    pub fn is_user_facing(&self) -> bool {
        matches!(self, RemoteError::InvalidReference(_) | RemoteError::Widget(_))
    }
}

/// Convenience type alias for Results in TubeRemote
pub type Result<T> = std::result::Result<T, RemoteError>;

/// Extension trait for converting other errors to RemoteError
pub trait IntoRemoteError<T> {
    /// Convert this error into a RemoteError with the given context
    fn widget_err(self, context: &str) -> Result<T>;
    fn config_err(self, context: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> IntoRemoteError<T> for std::result::Result<T, E> {
    fn widget_err(self, context: &str) -> Result<T> {
        self.map_err(|e| RemoteError::Widget(format!("{}: {}", context, e)))
    }

    fn config_err(self, context: &str) -> Result<T> {
        self.map_err(|e| RemoteError::Config(format!("{}: {}", context, e)))
    }
}
