//! Durable key-value storage surface.
//!
//! Saved comparisons are kept as one serialized blob under a single key, the
//! way a browser keeps them in local storage. Two implementations:
//! - `FileStore`: a JSON object of key -> string on disk, rewritten atomically.
//! - `MemoryStore`: in-memory store for tests, with injectable write failures.

use crate::error::StorageError;
use crate::persistence::{atomic_write_json, read_if_exists};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Trait for string key-value storage backends.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, `Ok(None)` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Key-value store backed by a single JSON file.
///
/// Every operation reads the file fresh, so two processes sharing the file
/// see each other's writes; the last writer wins.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self, key: &str) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = read_if_exists(&self.path).map_err(|e| StorageError::ReadFailed {
            key: key.to_string(),
            message: format!("{}: {}", self.path.display(), e),
        })?;
        match raw {
            None => Ok(BTreeMap::new()),
            Some(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Some(content) => {
                serde_json::from_str(&content).map_err(|e| StorageError::Malformed {
                    key: key.to_string(),
                    message: format!("{}: {}", self.path.display(), e),
                })
            }
        }
    }

    fn write(&self, key: &str, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        atomic_write_json(&self.path, entries).map_err(|e| StorageError::WriteFailed {
            key: key.to_string(),
            message: format!("{}: {}", self.path.display(), e),
        })
    }

    /// Loading for a mutation. A corrupt file is refused rather than
    /// overwritten, so other keys in it are not lost.
    fn load_for_write(&self, key: &str) -> Result<BTreeMap<String, String>, StorageError> {
        self.load(key).map_err(|e| match e {
            StorageError::Malformed { key, message } => StorageError::WriteFailed {
                key,
                message: format!("refusing to overwrite unreadable store ({message})"),
            },
            other => other,
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load(key)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.load_for_write(key)?;
        entries.insert(key.to_string(), value.to_string());
        self.write(key, &entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.load_for_write(key)?;
        if entries.remove(key).is_some() {
            self.write(key, &entries)?;
        }
        Ok(())
    }
}

/// In-memory key-value store for testing.
///
/// Thread-safe via `Mutex<HashMap>`. Does not persist across process restarts.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `set`/`remove` calls fail, as a full quota would.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `get` calls fail, as an unavailable backend would.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed {
                key: key.to_string(),
                message: "quota exceeded".to_string(),
            });
        }
        Ok(())
    }

    fn lock(
        &self,
        key: &str,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries.lock().map_err(|_| StorageError::ReadFailed {
            key: key.to_string(),
            message: "store lock poisoned".to_string(),
        })
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::ReadFailed {
                key: key.to_string(),
                message: "storage unavailable".to_string(),
            });
        }
        Ok(self.lock(key)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        self.lock(key)?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        self.lock(key)?.remove(key);
        Ok(())
    }
}
