//! Persistent key-value storage for session state.
//!
//! This module provides the `KeyValueStorage` seam the credential store
//! persists through, plus two implementations:
//!
//! - `FileStorage`: a flat string map kept in a JSON state file, written
//!   synchronously on every mutation
//! - `MemoryStorage`: process-local storage for tests and headless embedding
//!
//! Write failures are logged and swallowed; a store that cannot persist
//! behaves exactly like one with no prior state.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use tracing::warn;

/// Persistent string key-value storage.
///
/// `get` returning `None` covers both "never written" and "could not be
/// read"; callers cannot distinguish the two.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// File-backed storage holding all entries in one JSON document.
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open the state file at `path`, starting empty if it is absent or
    /// unreadable. Never fails.
    pub fn open(path: PathBuf) -> Self {
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(error) => {
                    warn!(path = %path.display(), %error, "Unreadable state file, starting empty");
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn flush(&self, entries: &BTreeMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            if let Err(error) = std::fs::create_dir_all(parent) {
                warn!(path = %self.path.display(), %error, "Failed to create state directory");
                return;
            }
        }

        let contents = match serde_json::to_string_pretty(entries) {
            Ok(contents) => contents,
            Err(error) => {
                warn!(%error, "Failed to serialize state");
                return;
            }
        };

        if let Err(error) = std::fs::write(&self.path, contents) {
            warn!(path = %self.path.display(), %error, "Failed to write state file");
        }
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.remove(key).is_some() {
            self.flush(&entries);
        }
    }
}

/// In-memory storage with no persistence at all.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
    }
}
