//! Outbound messages through the Bot API.

use async_trait::async_trait;
use saver_core::{CoreError, Notifier};
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::html;
use tracing::debug;

/// Sends texts as HTML messages.
///
/// Every text the bot produces is plain, so it is escaped before sending.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_text(&self, chat_id: i64, text: &str) -> saver_core::Result<()> {
        self.bot
            .send_message(ChatId(chat_id), html::escape(text))
            .parse_mode(ParseMode::Html)
            .await
            .map_err(|e| CoreError::Notify(e.to_string()))?;
        debug!(chat_id, "Message sent");
        Ok(())
    }
}
