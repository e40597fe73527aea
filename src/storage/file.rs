//! File-backed storage
//!
//! Each key is one file inside the data directory. Writes go to a temporary
//! file first and are renamed into place, so a failed write never leaves a
//! half-written record behind.

use super::{available_for, DurableStorage, StorageError};
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Directory-based key/value store with a byte quota
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    quota: usize,
}

impl FileStorage {
    /// Open (and create if needed) a store rooted at `dir`
    ///
    /// # Arguments
    ///
    /// * `dir` - Directory holding one file per key
    /// * `quota` - Total bytes allowed across all keys
    pub fn open(dir: impl Into<PathBuf>, quota: usize) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!("Opened file storage at {:?} (quota {} bytes)", dir, quota);
        Ok(Self { dir, quota })
    }

    /// Root directory of the store
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::Unavailable(format!("Unsupported storage key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn used_by_others(&self, target: &Path) -> Result<usize, StorageError> {
        let mut used = 0usize;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path == target || path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            used += entry.metadata()?.len() as usize;
        }
        Ok(used)
    }
}

impl DurableStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        let available = available_for(self.quota, self.used_by_others(&path)?);
        if value.len() > available {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                needed: value.len(),
                available,
            });
        }

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
