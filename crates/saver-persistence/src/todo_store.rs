//! Per-user todo list store.

use std::sync::Arc;

use saver_models::TodoItem;
use tracing::warn;

use crate::error::Result;
use crate::kv::{get_json, put_json, KvStore};

/// Manages persistence of todo lists, one ordered list per user ID.
#[derive(Clone)]
pub struct TodoStore {
    kv: Arc<dyn KvStore>,
}

impl TodoStore {
    /// Creates a store over the given backing.
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Loads a user's list. Missing or unreadable lists are empty.
    pub fn load(&self, user_id: i64) -> Vec<TodoItem> {
        match get_json(self.kv.as_ref(), &user_id.to_string()) {
            Ok(items) => items.unwrap_or_default(),
            Err(e) => {
                warn!(user_id, error = %e, "Failed to read todo list, starting empty");
                Vec::new()
            }
        }
    }

    /// Replaces a user's list.
    pub fn save(&self, user_id: i64, items: &[TodoItem]) -> Result<()> {
        put_json(self.kv.as_ref(), &user_id.to_string(), &items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use chrono::Utc;

    #[test]
    fn test_roundtrip_keeps_order() {
        let store = TodoStore::new(Arc::new(MemoryStore::new()));
        let items = vec![TodoItem::new("first", Utc::now()), TodoItem::new("second", Utc::now())];

        store.save(5, &items).unwrap();

        let loaded = store.load(5);
        assert_eq!(loaded, items);
    }

    #[test]
    fn test_missing_and_corrupt_are_empty() {
        let kv = Arc::new(MemoryStore::new());
        kv.put("2", b"[{").unwrap();
        let store = TodoStore::new(kv);

        assert!(store.load(1).is_empty());
        assert!(store.load(2).is_empty());
    }
}
