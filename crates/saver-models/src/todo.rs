//! Todo items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a user's todo list.
///
/// Users address items by their 1-based position in the list, not by `id`;
/// positions shift when an earlier item is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Creation time in epoch milliseconds, as a string.
    pub id: String,
    /// Task text.
    pub text: String,
    /// Whether the task is done.
    #[serde(default)]
    pub completed: bool,
    /// When the item was added.
    pub created: DateTime<Utc>,
}

impl TodoItem {
    /// Creates an open item.
    pub fn new(text: impl Into<String>, created: DateTime<Utc>) -> Self {
        Self {
            id: created.timestamp_millis().to_string(),
            text: text.into(),
            completed: false,
            created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_item_is_open() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let item = TodoItem::new("buy bread", created);
        assert_eq!(item.id, "1714564800000");
        assert!(!item.completed);
    }
}
