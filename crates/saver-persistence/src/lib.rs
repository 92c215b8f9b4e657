//! Persistence layer for the Telegram saver bot.
//!
//! All state lives in a small key-value abstraction ([`KvStore`]). The
//! production backing is a tree of JSON files written atomically (write to a
//! temp file, then rename):
//!
//! ```text
//! data/
//! ├── reminders/DUE_{epoch}_{user}.json
//! ├── users/{user}.json
//! ├── users/todos/{user}.json
//! └── state/cursor.json
//! ```
//!
//! # Example
//!
//! ```no_run
//! use saver_persistence::DataStores;
//!
//! let stores = DataStores::open("./data");
//! let due = stores.reminders.due(chrono::Utc::now().timestamp()).unwrap();
//! println!("{} reminders due", due.len());
//! ```

pub mod atomic;
pub mod cursor_store;
pub mod error;
pub mod kv;
pub mod reminder_store;
pub mod todo_store;
pub mod user_store;

use std::path::Path;
use std::sync::Arc;

pub use cursor_store::CursorStore;
pub use error::{PersistenceError, Result};
pub use kv::{FileStore, KvStore, MemoryStore};
pub use reminder_store::ReminderStore;
pub use todo_store::TodoStore;
pub use user_store::UserStore;

/// Every store the bot uses, opened over one data directory.
#[derive(Clone)]
pub struct DataStores {
    pub reminders: ReminderStore,
    pub users: UserStore,
    pub todos: TodoStore,
    pub cursor: CursorStore,
}

impl DataStores {
    /// Opens file-backed stores under `data_dir`. Directories are created on
    /// first write.
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        let root = data_dir.as_ref();
        Self {
            reminders: ReminderStore::new(Arc::new(FileStore::new(root.join("reminders")))),
            users: UserStore::new(Arc::new(FileStore::new(root.join("users")))),
            todos: TodoStore::new(Arc::new(FileStore::new(root.join("users").join("todos")))),
            cursor: CursorStore::new(Arc::new(FileStore::new(root.join("state")))),
        }
    }

    /// Opens in-memory stores.
    pub fn in_memory() -> Self {
        Self {
            reminders: ReminderStore::new(Arc::new(MemoryStore::new())),
            users: UserStore::new(Arc::new(MemoryStore::new())),
            todos: TodoStore::new(Arc::new(MemoryStore::new())),
            cursor: CursorStore::new(Arc::new(MemoryStore::new())),
        }
    }
}
