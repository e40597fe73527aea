//! Bounded, persisted play history
//!
//! The store keeps the most recently played videos, newest first, and
//! guarantees after every operation that:
//! - urls are unique (re-adding moves an entry to the front)
//! - there are at most `max_entries` entries
//! - the serialized form is at most `max_bytes` bytes
//! - every entry passes reference validation
//!
//! Storage failures never escape. A failed write leaves history correct in
//! memory; a corrupted record is discarded on load.

mod entry;

pub use entry::{HistoryEntry, MAX_TIMESTAMP_LEN};

use crate::events::{ClientEvent, Notifier};
use crate::storage::DurableStorage;
use crate::utils::config::HistoryConfig;
use crate::utils::error::{RemoteError, Result};
use crate::utils::format_timestamp;
use crate::validator::{extract_id, is_valid_reference};
use log::{debug, error, info, warn};
use serde_json::Value;
use std::collections::HashSet;

/// Storage key holding the serialized history
pub const HISTORY_KEY: &str = "videoHistory";

/// Play history backed by durable storage
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
    storage: Box<dyn DurableStorage>,
    limits: HistoryConfig,
    notifier: Notifier,
}

impl HistoryStore {
    /// Create an empty store; call [`HistoryStore::load`] to read persisted state
    pub fn new(storage: Box<dyn DurableStorage>, limits: HistoryConfig, notifier: Notifier) -> Self {
        Self {
            entries: Vec::with_capacity(limits.max_entries),
            storage,
            limits,
            notifier,
        }
    }

    /// Entries, newest first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Owned copy of the entries for the renderer
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry for `url` exists
    pub fn contains(&self, url: &str) -> bool {
        self.entries.iter().any(|e| e.url() == url)
    }

    /// Record a played video
    ///
    /// Invalid references are logged and ignored. An existing entry for the
    /// same url is replaced and moved to the front.
    ///
    /// # Arguments
    ///
    /// * `url` - Reference the video was played from
    /// * `title` - Known title; the configured fallback is used when absent or empty
    pub fn add(&mut self, url: &str, title: Option<&str>) {
        if !is_valid_reference(url) {
            warn!("{} rejected from history", RemoteError::invalid_reference(url));
            return;
        }

        let title = title
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.limits.fallback_title)
            .to_string();
        let timestamp = format_timestamp(&chrono::Local::now());
        let entry = HistoryEntry::new(url.to_string(), extract_id(url), title, timestamp);

        self.entries.retain(|e| e.url() != url);
        self.entries.insert(0, entry);
        self.entries.truncate(self.limits.max_entries);

        self.persist();
        self.publish();
    }

    /// Replace the in-memory history with the persisted record
    ///
    /// A record that cannot be read, is not valid JSON, or is not an array is
    /// treated as corrupted: it is deleted and the store starts empty. Entries
    /// failing structural validation are dropped and the filtered set is
    /// written back so the corruption does not recur.
    pub fn load(&mut self) {
        let raw = match self.storage.get_item(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No saved history");
                self.entries.clear();
                self.publish();
                return;
            }
            Err(e) => {
                error!("Failed to load history: {}", e);
                self.reset_corrupted();
                return;
            }
        };

        let candidates = match parse_persisted(&raw) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Invalid history format - resetting: {}", e);
                self.reset_corrupted();
                return;
            }
        };

        let total = candidates.len();
        let mut seen = HashSet::new();
        self.entries = candidates
            .iter()
            .filter_map(HistoryEntry::from_persisted)
            .filter(|entry| seen.insert(entry.url().to_string()))
            .take(self.limits.max_entries)
            .collect();

        let oversized = serde_json::to_string(&self.entries)
            .map(|json| json.len() > self.limits.max_bytes)
            .unwrap_or(false);

        if self.entries.len() != total {
            warn!("Removed {} invalid history items", total - self.entries.len());
            self.persist();
        } else if oversized {
            self.persist();
        }

        info!("Loaded {} history entries", self.entries.len());
        self.publish();
    }

    /// Write the history to durable storage
    ///
    /// Oldest entries are dropped until the serialized form fits within
    /// `max_bytes`. When the storage quota is exceeded the history is cut to
    /// `quota_fallback_entries` and written once more; if that also fails
    /// the persisted record is deleted. Other write failures are logged.
    pub fn persist(&mut self) {
        let json = match self.serialize_within_limit() {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize history: {}", e);
                return;
            }
        };

        match self.storage.set_item(HISTORY_KEY, &json) {
            Ok(()) => debug!("Saved {} history entries ({} bytes)", self.entries.len(), json.len()),
            Err(e) if e.is_quota_exceeded() => {
                error!(
                    "Storage quota exceeded, keeping the {} most recent history entries",
                    self.limits.quota_fallback_entries
                );
                self.entries.truncate(self.limits.quota_fallback_entries);

                let retried = serde_json::to_string(&self.entries)
                    .map_err(RemoteError::from)
                    .and_then(|json| self.storage.set_item(HISTORY_KEY, &json).map_err(RemoteError::from));

                if let Err(e) = retried {
                    error!("Failed to save even trimmed history: {}", e);
                    if let Err(e) = self.storage.remove_item(HISTORY_KEY) {
                        error!("Failed to remove history record: {}", e);
                    }
                }
            }
            Err(e) => error!("Failed to save history: {}", e),
        }
    }

    /// Remove every entry and persist the empty history
    ///
    /// Confirmation is the caller's job.
    pub fn clear(&mut self) {
        info!("Clearing {} history entries", self.entries.len());
        self.entries.clear();
        self.persist();
        self.publish();
    }

    fn serialize_within_limit(&mut self) -> Result<String> {
        let mut json = serde_json::to_string(&self.entries)?;

        if json.len() > self.limits.max_bytes {
            warn!(
                "History too large ({} bytes, limit {}), trimming...",
                json.len(),
                self.limits.max_bytes
            );
        }

        while json.len() > self.limits.max_bytes && !self.entries.is_empty() {
            self.entries.pop();
            json = serde_json::to_string(&self.entries)?;
            warn!("Dropped oldest history entry, {} bytes remain", json.len());
        }

        Ok(json)
    }

    fn reset_corrupted(&mut self) {
        self.entries.clear();
        if let Err(e) = self.storage.remove_item(HISTORY_KEY) {
            error!("Failed to remove corrupted history: {}", e);
        }
        self.publish();
    }

    fn publish(&self) {
        self.notifier.emit(ClientEvent::HistoryChanged(self.snapshot()));
    }
}

fn parse_persisted(raw: &str) -> Result<Vec<Value>> {
    match serde_json::from_str(raw)? {
        Value::Array(items) => Ok(items),
        other => Err(RemoteError::CorruptState(format!(
            "expected an array, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
