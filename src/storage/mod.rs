//! Durable key/value storage for TubeRemote
//!
//! Storage is treated as an unreliable resource: writes can fail with a
//! dedicated quota error and reads can return anything. Callers are
//! expected to recover locally (see the history store).

mod file;
mod memory;
mod preferences;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use preferences::{Section, UiPreferences};

use thiserror::Error;

/// Storage failure
#[derive(Error, Debug)]
pub enum StorageError {
    /// Writing the value would exceed the storage quota
    #[error("Quota exceeded writing '{key}': {needed} bytes needed, {available} available")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },

    /// Underlying I/O failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage cannot be used at all
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Whether this is the dedicated quota failure
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, StorageError::QuotaExceeded { .. })
    }
}

/// Durable storage trait
///
/// Implementations are cheap handles; clones share the same backing store.
pub trait DurableStorage: Send {
    /// Read the value stored under `key`
    ///
    /// # Returns
    ///
    /// Returns `None` when the key is absent
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::QuotaExceeded`] when the store is full
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`; deleting a missing key is not an error
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Bytes still free under `quota` once `key` is replaced
pub(crate) fn available_for(quota: usize, used_by_others: usize) -> usize {
    quota.saturating_sub(used_by_others)
}
