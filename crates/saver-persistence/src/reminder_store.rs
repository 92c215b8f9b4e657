//! Reminder store keyed by [`DueKey`].

use std::sync::Arc;

use saver_models::{DueKey, Reminder};
use tracing::{debug, warn};

use crate::error::Result;
use crate::kv::{get_json, put_json, KvStore};

/// Manages persistence of reminders.
///
/// Each reminder is one record stored under its `DUE:{epoch}:{user}` key;
/// the due-scan parses keys first and only reads records that have come due.
#[derive(Clone)]
pub struct ReminderStore {
    kv: Arc<dyn KvStore>,
}

impl ReminderStore {
    /// Creates a store over the given backing.
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Saves a reminder under `key`, replacing any record with the same key.
    pub fn save(&self, key: DueKey, reminder: &Reminder) -> Result<()> {
        put_json(self.kv.as_ref(), &key.to_string(), reminder)
    }

    /// Loads the reminder stored under `key`.
    pub fn load(&self, key: DueKey) -> Result<Option<Reminder>> {
        get_json(self.kv.as_ref(), &key.to_string())
    }

    /// Deletes the reminder stored under `key`.
    pub fn delete(&self, key: DueKey) -> Result<()> {
        self.kv.delete(&key.to_string())
    }

    /// Lists every reminder key in due order. Malformed keys are skipped.
    pub fn keys(&self) -> Result<Vec<DueKey>> {
        let mut keys: Vec<DueKey> = self
            .kv
            .scan_prefix(&DueKey::prefix())?
            .into_iter()
            .filter_map(|raw| match raw.parse::<DueKey>() {
                Ok(key) => Some(key),
                Err(e) => {
                    warn!(key = %raw, error = %e, "Skipping malformed reminder key");
                    None
                }
            })
            .collect();
        keys.sort();
        Ok(keys)
    }

    /// Returns every reminder due at or before `now` (epoch seconds).
    ///
    /// A record that cannot be read is logged and skipped; it does not abort
    /// the scan.
    pub fn due(&self, now: i64) -> Result<Vec<(DueKey, Reminder)>> {
        let keys: Vec<DueKey> = self.keys()?.into_iter().filter(|k| k.is_due(now)).collect();
        Ok(self.load_all(keys))
    }

    /// Returns the pending reminders of one user in due order.
    pub fn for_user(&self, user_id: i64) -> Result<Vec<(DueKey, Reminder)>> {
        let keys: Vec<DueKey> = self
            .keys()?
            .into_iter()
            .filter(|k| k.user_id == user_id)
            .collect();
        Ok(self.load_all(keys))
    }

    fn load_all(&self, keys: Vec<DueKey>) -> Vec<(DueKey, Reminder)> {
        let mut found = Vec::with_capacity(keys.len());
        for key in keys {
            match self.load(key) {
                Ok(Some(reminder)) => found.push((key, reminder)),
                Ok(None) => debug!(key = %key, "Reminder vanished during scan"),
                Err(e) => warn!(key = %key, error = %e, "Failed to read reminder"),
            }
        }
        found
    }
}
