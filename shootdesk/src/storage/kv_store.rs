//! Key-value persistence
//!
//! String values stored under short string keys, the way a browser's local
//! storage holds them. Writes are synchronous so the cache can persist on
//! every change before returning to the caller.
//!
//! Example: key "shoots" is stored at "<root>/shoots.json"

use crate::error::{AppError, Result};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Persistence port used by the local cache
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed store: one file per key under a root directory
#[derive(Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a new store at the given root directory
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Initialize the store (create directory if needed)
    pub fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        tracing::info!("Key-value store initialized at: {:?}", self.root);
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get file path for a key
    fn get_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(AppError::Generic(format!("Invalid storage key: {:?}", key)));
        }

        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.get_path(key)?;

        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.get_path(key)?;
        fs::create_dir_all(&self.root)?;

        // Write to temp file first (atomic write)
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;

        fs::rename(&temp_path, &path)?;

        tracing::debug!("Wrote key {} ({} bytes)", key, value.len());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.get_path(key)?;

        if !path.exists() {
            return Ok(()); // Already removed
        }

        fs::remove_file(&path)?;

        tracing::debug!("Removed key: {}", key);

        Ok(())
    }
}

/// In-memory store, for tests and sessions that should not touch disk
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}
