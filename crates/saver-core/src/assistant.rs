//! Message dispatcher.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use saver_models::{HistoryEntry, Intent, UserRecord};
use saver_persistence::DataStores;
use tracing::{debug, error, info, warn};

use crate::config::BotConfig;
use crate::error::Result;
use crate::handlers::{handle_calendar, handle_reminder, handle_todo, handle_weather, list_reminders};
use crate::intent::decode_intent;
use crate::llm::{ChatMessage, ChatModel};
use crate::messages;
use crate::prompt::system_prompt;

/// An inbound chat message, independent of the transport it arrived on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub user_id: i64,
    pub chat_id: i64,
    pub first_name: String,
    pub text: String,
}

/// Routes inbound text through the model to the intent handlers.
pub struct Assistant {
    config: Arc<BotConfig>,
    stores: DataStores,
    model: Arc<dyn ChatModel>,
}

impl Assistant {
    pub fn new(config: Arc<BotConfig>, stores: DataStores, model: Arc<dyn ChatModel>) -> Self {
        Self {
            config,
            stores,
            model,
        }
    }

    /// Answers an inbound message.
    ///
    /// Creates the user record on first contact, answers `/start`, `/help`
    /// and `/reminders` directly and sends everything else to the model.
    pub async fn respond(&self, message: &InboundMessage) -> String {
        self.respond_at(message, Utc::now()).await
    }

    /// [`respond`](Self::respond) with an explicit clock.
    pub async fn respond_at(&self, message: &InboundMessage, now: DateTime<Utc>) -> String {
        let user = match self.stores.users.get_or_create(
            message.user_id,
            message.chat_id,
            &message.first_name,
            now,
        ) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(user_id = message.user_id, error = %e, "Failed to create user record");
                None
            }
        };

        let text = message.text.trim();
        if text.starts_with("/start") {
            return messages::welcome(&message.first_name);
        }
        if text.starts_with("/help") {
            return messages::HELP.to_string();
        }
        if text.starts_with("/reminders") {
            let tz = self.user_timezone(user.as_ref());
            return list_reminders(&self.stores.reminders, message.user_id, tz).unwrap_or_else(|e| {
                error!(user_id = message.user_id, error = %e, "Failed to list reminders");
                messages::APOLOGY.to_string()
            });
        }

        self.process_message_at(message, now).await
    }

    /// Sends free text to the model and dispatches the resulting intent.
    ///
    /// Never fails: any error becomes the fixed apology.
    pub async fn process_message_at(&self, message: &InboundMessage, now: DateTime<Utc>) -> String {
        match self.try_process(message, now).await {
            Ok(response) => response,
            Err(e) => {
                error!(user_id = message.user_id, error = %e, "Failed to process message");
                messages::APOLOGY.to_string()
            }
        }
    }

    async fn try_process(&self, message: &InboundMessage, now: DateTime<Utc>) -> Result<String> {
        let user = self.stores.users.load(message.user_id);
        let tz = self.user_timezone(user.as_ref());
        let today = now.with_timezone(&tz).date_naive();

        let mut conversation = vec![ChatMessage::system(system_prompt(today))];
        if let Some(user) = &user {
            for entry in user.recent_messages(self.config.context_turns) {
                conversation.push(ChatMessage::user(&entry.text));
                conversation.push(ChatMessage::assistant(&entry.response));
            }
        }
        conversation.push(ChatMessage::user(&message.text));

        let reply = self.model.complete(conversation).await?;
        let intent = decode_intent(&reply);
        info!(user_id = message.user_id, intent = intent.tag(), "Dispatching intent");

        let response = self.dispatch(intent, message, tz, now)?;

        let entry = HistoryEntry::message(&message.text, &response, now);
        match self
            .stores
            .users
            .append_history(message.user_id, entry, self.config.history_limit)
        {
            Ok(true) => {}
            Ok(false) => debug!(user_id = message.user_id, "History skipped for unknown user"),
            Err(e) => warn!(user_id = message.user_id, error = %e, "Failed to record history"),
        }

        Ok(response)
    }

    fn dispatch(&self, intent: Intent, message: &InboundMessage, tz: Tz, now: DateTime<Utc>) -> Result<String> {
        match intent {
            Intent::Reminder(request) => handle_reminder(
                &self.stores.reminders,
                &request,
                message.user_id,
                message.chat_id,
                tz,
                now,
            ),
            Intent::Question { answer } => Ok(answer),
            Intent::Todo(command) => handle_todo(&self.stores.todos, &command, message.user_id, now),
            Intent::Weather(request) => Ok(handle_weather(&request, &mut rand::rng())),
            Intent::Calendar(request) => {
                Ok(handle_calendar(&request, now.with_timezone(&tz).date_naive()))
            }
            Intent::Unknown => Ok(messages::NOT_UNDERSTOOD.to_string()),
        }
    }

    fn user_timezone(&self, user: Option<&UserRecord>) -> Tz {
        user.and_then(|u| u.preferences.timezone.parse().ok())
            .unwrap_or(self.config.timezone)
    }
}
