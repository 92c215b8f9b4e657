//! User records and conversation history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of history entries kept per user.
pub const HISTORY_LIMIT: usize = 20;

/// Timezone assigned to new users.
pub const DEFAULT_TIMEZONE: &str = "Asia/Tehran";

/// Language assigned to new users.
pub const DEFAULT_LANGUAGE: &str = "fa";

/// Per-user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// IANA timezone name.
    pub timezone: String,
    /// Language code.
    pub language: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// One processed exchange in a user's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Entry kind. Only `"message"` entries are fed back as context.
    #[serde(rename = "type", default = "message_kind")]
    pub kind: String,
    /// What the user wrote.
    pub text: String,
    /// What the bot answered.
    pub response: String,
    /// When the exchange happened.
    pub time: DateTime<Utc>,
}

fn message_kind() -> String {
    "message".to_string()
}

impl HistoryEntry {
    /// Creates a message exchange entry.
    pub fn message(text: impl Into<String>, response: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            kind: message_kind(),
            text: text.into(),
            response: response.into(),
            time,
        }
    }

    /// Returns true for message exchanges.
    pub fn is_message(&self) -> bool {
        self.kind == "message"
    }
}

/// A chat participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Telegram user ID.
    pub user_id: i64,

    /// Chat the user talks to the bot from.
    pub chat_id: i64,

    /// Display name.
    #[serde(default)]
    pub first_name: String,

    /// Preferences.
    #[serde(default)]
    pub preferences: Preferences,

    /// Bounded history, oldest first.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,

    /// When the record was created.
    pub created: DateTime<Utc>,
}

impl UserRecord {
    /// Creates a user with default preferences and empty history.
    pub fn new(user_id: i64, chat_id: i64, first_name: impl Into<String>, created: DateTime<Utc>) -> Self {
        Self {
            user_id,
            chat_id,
            first_name: first_name.into(),
            preferences: Preferences::default(),
            history: Vec::new(),
            created,
        }
    }

    /// Appends an exchange, keeping at most `limit` entries.
    pub fn push_history_bounded(&mut self, entry: HistoryEntry, limit: usize) {
        self.history.push(entry);
        if self.history.len() > limit {
            let excess = self.history.len() - limit;
            self.history.drain(..excess);
        }
    }

    /// Returns the last `count` message exchanges, oldest first.
    pub fn recent_messages(&self, count: usize) -> Vec<&HistoryEntry> {
        let messages: Vec<&HistoryEntry> = self.history.iter().filter(|h| h.is_message()).collect();
        let skip = messages.len().saturating_sub(count);
        messages.into_iter().skip(skip).collect()
    }

    /// Display name, if one is known.
    pub fn display_name(&self) -> Option<&str> {
        let name = self.first_name.trim();
        (!name.is_empty()).then_some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserRecord {
        UserRecord::new(1, 10, "Sara", Utc::now())
    }

    #[test]
    fn test_new_user_defaults() {
        let u = user();
        assert_eq!(u.preferences.timezone, "Asia/Tehran");
        assert_eq!(u.preferences.language, "fa");
        assert!(u.history.is_empty());
        assert_eq!(u.display_name(), Some("Sara"));
    }

    #[test]
    fn test_history_is_bounded_fifo() {
        let mut u = user();
        for i in 0..25 {
            u.push_history_bounded(HistoryEntry::message(format!("q{}", i), format!("a{}", i), Utc::now()), HISTORY_LIMIT);
            assert!(u.history.len() <= HISTORY_LIMIT);
        }
        assert_eq!(u.history.len(), 20);
        assert_eq!(u.history[0].text, "q5");
        assert_eq!(u.history[19].text, "q24");
    }

    #[test]
    fn test_recent_messages() {
        let mut u = user();
        for i in 0..8 {
            u.push_history_bounded(HistoryEntry::message(format!("q{}", i), "a", Utc::now()), HISTORY_LIMIT);
        }
        let recent = u.recent_messages(5);
        let texts: Vec<&str> = recent.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["q3", "q4", "q5", "q6", "q7"]);
    }

    #[test]
    fn test_recent_messages_skips_other_kinds() {
        let mut u = user();
        u.push_history_bounded(HistoryEntry::message("q0", "a0", Utc::now()), HISTORY_LIMIT);
        u.push_history_bounded(HistoryEntry {
            kind: "system".to_string(),
            text: "note".to_string(),
            response: String::new(),
            time: Utc::now(),
        }, HISTORY_LIMIT);
        assert_eq!(u.recent_messages(5).len(), 1);
    }

    #[test]
    fn test_blank_name_is_unknown() {
        let u = UserRecord::new(1, 1, "  ", Utc::now());
        assert_eq!(u.display_name(), None);
    }

    #[test]
    fn test_deserialize_legacy_record() {
        let json = r#"{
            "userId": 7,
            "chatId": 7,
            "firstName": "Ali",
            "history": [{"type": "message", "text": "hi", "response": "hello", "time": "2024-01-01T00:00:00Z"}],
            "created": "2024-01-01T00:00:00Z"
        }"#;
        let u: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(u.preferences, Preferences::default());
        assert_eq!(u.history.len(), 1);
        assert!(u.history[0].is_message());
    }
}
