//! Key-value persistence adapters.
//!
//! Stores read and write whole serialized values by string key. `FileStore`
//! keeps one JSON file per key in the data directory; `MemoryStore` backs the
//! tests and can be told to reject reads or writes.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use thiserror::Error;

/// Key under which the task collection is stored.
pub const TASKS_KEY: &str = "tasks";
/// Key under which the dark mode preference is stored.
pub const DARK_MODE_KEY: &str = "darkMode";

/// Result type for persistence adapter operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors returned by persistence adapters.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage io error for key `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    /// The key cannot be mapped to a storage location.
    #[error("invalid storage key: `{0}`")]
    InvalidKey(String),

    /// The backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable string storage addressed by key.
///
/// `set` overwrites; `get` returns `None` for a key that was never set.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

/// Directory-backed store: key `k` lives at `<dir>/k.json`.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(FileStore {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        // Atomic-ish write via temp + rename.
        let tmp = path.with_extension("json.tmp");
        let write = || -> io::Result<()> {
            let mut f = File::create(&tmp)?;
            f.write_all(value.as_bytes())?;
            f.flush()?;
            fs::rename(&tmp, &path)
        };
        write().map_err(|source| StorageError::Io {
            key: key.to_string(),
            source,
        })
    }
}

/// In-process store. Values vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    reject_reads: AtomicBool,
    reject_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `get` fail (or succeed again).
    pub fn set_reject_reads(&self, reject: bool) {
        self.reject_reads.store(reject, Ordering::SeqCst);
    }

    /// Make every subsequent `set` fail (or succeed again).
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Store a raw value directly, bypassing any write rejection.
    pub fn seed(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        if self.reject_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("read of `{key}` rejected")));
        }
        let values = self
            .values
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".into()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("write to `{key}` rejected")));
        }
        let mut values = self
            .values
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".into()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_missing_key_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.get(TASKS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_file_store_set_overwrites_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::open(dir.path()).unwrap();

        store.set(DARK_MODE_KEY, "false").unwrap();
        store.set(DARK_MODE_KEY, "true").unwrap();

        assert_eq!(store.get(DARK_MODE_KEY).unwrap().as_deref(), Some("true"));
        assert!(dir.path().join("darkMode.json").exists());
        assert!(!dir.path().join("darkMode.json.tmp").exists());
    }

    #[test]
    fn test_file_store_creates_nested_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("a").join("b");
        let store = FileStore::open(&nested).unwrap();
        store.set(TASKS_KEY, "[]").unwrap();
        assert!(nested.join("tasks.json").exists());
        assert_eq!(store.get(TASKS_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::open(dir.path()).unwrap();
        for key in ["", "../escape", "a/b", "dots.json"] {
            assert!(matches!(store.set(key, "x"), Err(StorageError::InvalidKey(_))));
            assert!(matches!(store.get(key), Err(StorageError::InvalidKey(_))));
        }
    }

    #[test]
    fn test_memory_store_reject_reads() {
        let store = MemoryStore::new();
        store.seed(TASKS_KEY, "[]");
        store.set_reject_reads(true);
        assert!(matches!(store.get(TASKS_KEY), Err(StorageError::Unavailable(_))));
        store.set_reject_reads(false);
        assert_eq!(store.get(TASKS_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_memory_store_reject_writes() {
        let store = MemoryStore::new();
        store.set(TASKS_KEY, "[]").unwrap();
        store.set_reject_writes(true);
        assert!(matches!(store.set(TASKS_KEY, "[1]"), Err(StorageError::Unavailable(_))));
        assert_eq!(store.get(TASKS_KEY).unwrap().as_deref(), Some("[]"));

        store.set_reject_writes(false);
        store.set(TASKS_KEY, "[1]").unwrap();
        assert_eq!(store.get(TASKS_KEY).unwrap().as_deref(), Some("[1]"));
    }
}
