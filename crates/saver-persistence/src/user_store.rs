//! User record store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use saver_models::{HistoryEntry, UserRecord};
use tracing::{debug, warn};

use crate::error::Result;
use crate::kv::{get_json, put_json, KvStore};

/// Manages persistence of user records, one record per user ID.
#[derive(Clone)]
pub struct UserStore {
    kv: Arc<dyn KvStore>,
}

impl UserStore {
    /// Creates a store over the given backing.
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Loads a user record.
    ///
    /// A missing or unreadable record is reported as absent.
    pub fn load(&self, user_id: i64) -> Option<UserRecord> {
        match get_json(self.kv.as_ref(), &user_id.to_string()) {
            Ok(record) => record,
            Err(e) => {
                warn!(user_id, error = %e, "Failed to read user record, treating as absent");
                None
            }
        }
    }

    /// Saves a user record.
    pub fn save(&self, record: &UserRecord) -> Result<()> {
        put_json(self.kv.as_ref(), &record.user_id.to_string(), record)
    }

    /// Returns the user's record, creating it on first contact.
    pub fn get_or_create(
        &self,
        user_id: i64,
        chat_id: i64,
        first_name: &str,
        now: DateTime<Utc>,
    ) -> Result<UserRecord> {
        if let Some(existing) = self.load(user_id) {
            return Ok(existing);
        }
        let record = UserRecord::new(user_id, chat_id, first_name, now);
        self.save(&record)?;
        debug!(user_id, "Created user record");
        Ok(record)
    }

    /// Appends an exchange to the user's history, keeping at most `limit`
    /// entries. Returns `false` if the user has no record.
    pub fn append_history(&self, user_id: i64, entry: HistoryEntry, limit: usize) -> Result<bool> {
        let Some(mut record) = self.load(user_id) else {
            debug!(user_id, "No user record, history not recorded");
            return Ok(false);
        };
        record.push_history_bounded(entry, limit);
        self.save(&record)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{FileStore, MemoryStore};
    use saver_models::HISTORY_LIMIT;
    use tempfile::tempdir;

    fn store() -> UserStore {
        UserStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_get_or_create_is_stable() {
        let store = store();
        let now = Utc::now();

        let first = store.get_or_create(7, 70, "Ali", now).unwrap();
        let second = store.get_or_create(7, 70, "Someone Else", now).unwrap();

        assert_eq!(first, second);
        assert_eq!(second.first_name, "Ali");
    }

    #[test]
    fn test_load_missing() {
        assert!(store().load(1).is_none());
    }

    #[test]
    fn test_corrupt_record_is_absent() {
        let kv = Arc::new(MemoryStore::new());
        kv.put("9", b"not json").unwrap();
        let store = UserStore::new(kv);

        assert!(store.load(9).is_none());
    }

    #[test]
    fn test_append_history_bounded() {
        let store = store();
        store.get_or_create(1, 1, "Sara", Utc::now()).unwrap();

        for i in 0..30 {
            let entry = HistoryEntry::message(format!("q{}", i), "a", Utc::now());
            assert!(store.append_history(1, entry, HISTORY_LIMIT).unwrap());
        }

        let record = store.load(1).unwrap();
        assert_eq!(record.history.len(), HISTORY_LIMIT);
        assert_eq!(record.history.first().unwrap().text, "q10");
        assert_eq!(record.history.last().unwrap().text, "q29");
    }

    #[test]
    fn test_append_history_without_record() {
        let store = store();
        let entry = HistoryEntry::message("q", "a", Utc::now());
        assert!(!store.append_history(1, entry, HISTORY_LIMIT).unwrap());
        assert!(store.load(1).is_none());
    }

    #[test]
    fn test_file_layout() {
        let dir = tempdir().unwrap();
        let store = UserStore::new(Arc::new(FileStore::new(dir.path())));
        store.get_or_create(123, 123, "Reza", Utc::now()).unwrap();

        assert!(dir.path().join("123.json").exists());
    }
}
