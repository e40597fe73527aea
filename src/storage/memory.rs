//! In-memory storage backend
//!
//! Used by tests and by embedders that persist elsewhere. Supports a quota
//! and one-shot failure injection so recovery paths can be exercised.

use super::{available_for, DurableStorage, StorageError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Inner {
    items: HashMap<String, String>,
    quota: Option<usize>,
    injected_failures: Vec<StorageError>,
    writes: usize,
}

/// Shared in-memory key/value store
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStorage {
    /// Create an empty store without a quota
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store limited to `quota` bytes across all keys
    pub fn with_quota(quota: usize) -> Self {
        let storage = Self::default();
        storage.inner.lock().quota = Some(quota);
        storage
    }

    /// Make the next write fail with `error`; calls queue up in order
    pub fn fail_next_write(&self, error: StorageError) {
        self.inner.lock().injected_failures.push(error);
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.inner.lock().writes
    }

    /// Whether `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.lock().items.contains_key(key)
    }

    /// Store a raw value, bypassing quota and failure injection
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.inner.lock().items.insert(key.to_string(), value.to_string());
    }

    /// Read a raw value
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.lock().items.get(key).cloned()
    }
}

impl DurableStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.lock().items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.lock();

        if !inner.injected_failures.is_empty() {
            return Err(inner.injected_failures.remove(0));
        }

        if let Some(quota) = inner.quota {
            let used_by_others: usize = inner
                .items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = key.len() + value.len();
            let available = available_for(quota, used_by_others);
            if needed > available {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    available,
                });
            }
        }

        inner.items.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.inner.lock().items.remove(key);
        Ok(())
    }
}
