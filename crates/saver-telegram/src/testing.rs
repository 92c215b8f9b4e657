//! Fakes for the network collaborators.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use saver_core::{BotConfig, ChatMessage, ChatModel, CoreError, Notifier, Result};
use saver_models::{Recurrence, Reminder};
use saver_persistence::DataStores;

use crate::state::{create_shared_state, SaverState};

/// Model that always answers with the same text.
pub struct FixedModel(pub &'static str);

#[async_trait]
impl ChatModel for FixedModel {
    async fn complete(&self, _messages: Vec<ChatMessage>) -> Result<String> {
        Ok(self.0.to_string())
    }
}

/// Notifier that records what it was asked to send.
#[derive(Default)]
pub struct Outbox {
    pub sent: Mutex<Vec<(i64, String)>>,
    pub fail: bool,
}

impl Outbox {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for Outbox {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        if self.fail {
            return Err(CoreError::Notify("chat not found".to_string()));
        }
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}

/// In-memory state answering every message with `reply`.
pub fn state_with(reply: &'static str, outbox: Arc<Outbox>) -> Arc<SaverState> {
    state_with_config(BotConfig::new(), reply, outbox)
}

pub fn state_with_config(config: BotConfig, reply: &'static str, outbox: Arc<Outbox>) -> Arc<SaverState> {
    create_shared_state(
        Arc::new(config),
        DataStores::in_memory(),
        Arc::new(FixedModel(reply)),
        outbox,
    )
}

/// Stores a one-off reminder for user 42 that fell due an hour ago.
pub fn store_overdue_reminder(stores: &DataStores) {
    let tz = chrono_tz::Asia::Tehran;
    let past = Utc::now().with_timezone(&tz) - Duration::hours(1);
    let reminder = Reminder::new(
        42,
        4242,
        past.date_naive(),
        past.time(),
        "water the plants",
        Recurrence::None,
    )
    .with_timezone(tz);
    let key = reminder.due_key(tz).unwrap();
    stores.reminders.save(key, &reminder).unwrap();
}
