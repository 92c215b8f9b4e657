//! Long-polling cursor.

use std::sync::Arc;

use tracing::warn;

use crate::error::Result;
use crate::kv::{get_json, put_json, KvStore};

const CURSOR_KEY: &str = "cursor";

/// Remembers the next Telegram update offset across restarts.
#[derive(Clone)]
pub struct CursorStore {
    kv: Arc<dyn KvStore>,
}

impl CursorStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Returns the saved offset. An unreadable cursor starts over.
    pub fn load(&self) -> Option<i32> {
        get_json(self.kv.as_ref(), CURSOR_KEY).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read polling cursor");
            None
        })
    }

    pub fn save(&self, offset: i32) -> Result<()> {
        put_json(self.kv.as_ref(), CURSOR_KEY, &offset)
    }
}
