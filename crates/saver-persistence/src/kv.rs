//! Minimal embedded key-value abstraction.
//!
//! Reminder, user and todo logic is written once against [`KvStore`]; the
//! backing can be a directory of JSON files ([`FileStore`]) or a map in
//! memory ([`MemoryStore`]).

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::atomic::{atomic_write, read_optional, remove_if_exists};
use crate::error::{PersistenceError, Result};

/// Byte-oriented key-value store.
pub trait KvStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Removes `key`. Removing a missing key succeeds.
    fn delete(&self, key: &str) -> Result<()>;

    /// Lists every key starting with `prefix`, in ascending order.
    fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Reads and deserializes a JSON value.
pub fn get_json<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

/// Serializes and stores a JSON value.
pub fn put_json<T: Serialize>(store: &dyn KvStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    store.put(key, &json)
}

/// Flat-file store: one `{key}.json` file per key in a single directory.
///
/// Key delimiters `:` become `_` in file names, so keys themselves must not
/// contain `_` or path separators:
/// ```text
/// reminders/
/// ├── DUE_1704099600_42.json
/// └── DUE_1704186000_42.json
/// ```
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created lazily.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || key.contains('_')
            || key.contains('/')
            || key.contains('\\')
            || key.starts_with('.')
        {
            return Err(PersistenceError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key.replace(':', "_"))))
    }

    fn key_for(file_name: &str) -> Option<String> {
        file_name
            .strip_suffix(".json")
            .filter(|stem| !stem.is_empty() && !stem.starts_with('.'))
            .map(|stem| stem.replace('_', ":"))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        read_optional(&self.path_for(key)?)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        atomic_write(&self.path_for(key)?, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        remove_if_exists(&self.path_for(key)?)
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir).map_err(|source| PersistenceError::ReadError {
            path: self.dir.clone(),
            source,
        })?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PersistenceError::ReadError {
                path: self.dir.clone(),
                source,
            })?;
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(key) = entry.file_name().to_str().and_then(Self::key_for) {
                if key.starts_with(prefix) {
                    keys.push(key);
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// In-memory store, mainly for tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.entries.lock().map_err(|_| PersistenceError::LockPoisoned)
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .lock()?
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        value: i32,
    }

    fn exercise(store: &dyn KvStore) {
        assert!(store.get("DUE:100:1").unwrap().is_none());

        store.put("DUE:100:1", b"a").unwrap();
        store.put("DUE:50:2", b"b").unwrap();
        store.put("REMINDERS:1", b"c").unwrap();

        assert_eq!(store.get("DUE:100:1").unwrap(), Some(b"a".to_vec()));
        assert_eq!(store.scan_prefix("DUE:").unwrap(), vec!["DUE:100:1", "DUE:50:2"]);

        store.delete("DUE:100:1").unwrap();
        store.delete("DUE:100:1").unwrap();
        assert_eq!(store.scan_prefix("DUE:").unwrap(), vec!["DUE:50:2"]);
        assert_eq!(store.scan_prefix("").unwrap().len(), 2);
    }

    #[test]
    fn test_memory_store() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn test_file_store() {
        let dir = tempdir().unwrap();
        exercise(&FileStore::new(dir.path().join("reminders")));
    }

    #[test]
    fn test_file_store_substitutes_delimiter() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.put("DUE:1704099600:42", b"{}").unwrap();

        assert!(dir.path().join("DUE_1704099600_42.json").exists());
    }

    #[test]
    fn test_file_store_scan_ignores_foreign_entries() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.put("42", b"{}").unwrap();
        fs::create_dir_all(dir.path().join("todos")).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        assert_eq!(store.scan_prefix("").unwrap(), vec!["42"]);
    }

    #[test]
    fn test_file_store_scan_missing_dir() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nope"));
        assert!(store.scan_prefix("DUE:").unwrap().is_empty());
    }

    #[test]
    fn test_file_store_rejects_unmappable_keys() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(matches!(store.put("a_b", b"x"), Err(PersistenceError::InvalidKey(_))));
        assert!(matches!(store.put("../etc", b"x"), Err(PersistenceError::InvalidKey(_))));
        assert!(matches!(store.get(""), Err(PersistenceError::InvalidKey(_))));
    }

    #[test]
    fn test_json_helpers() {
        let store = MemoryStore::new();
        let sample = Sample {
            name: "test".to_string(),
            value: 42,
        };

        put_json(&store, "sample", &sample).unwrap();
        let loaded: Option<Sample> = get_json(&store, "sample").unwrap();
        assert_eq!(loaded, Some(sample));

        let missing: Option<Sample> = get_json(&store, "other").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_get_json_corrupt() {
        let store = MemoryStore::new();
        store.put("bad", b"{not json").unwrap();
        let result: Result<Option<Sample>> = get_json(&store, "bad");
        assert!(matches!(result, Err(PersistenceError::SerializeError(_))));
    }
}
