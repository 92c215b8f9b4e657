//! Inbound updates.
//!
//! Webhook and one-shot payloads are decoded into [`IncomingUpdate`], a
//! lenient subset of the Bot API `Update` object; long polling receives
//! teloxide's own [`Update`]. Both reduce to an [`InboundMessage`].

use saver_core::InboundMessage;
use serde::Deserialize;
use teloxide::types::{Update, UpdateKind};

/// The parts of a Bot API update the bot reads.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingUpdate {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub chat: IncomingChat,
    #[serde(default)]
    pub from: Option<IncomingUser>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingChat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
}

impl IncomingUpdate {
    /// Decodes an update from its JSON text.
    pub fn from_json(payload: &str) -> serde_json::Result<Self> {
        serde_json::from_str(payload)
    }

    /// The text message carried by this update, if any.
    ///
    /// Updates without a message, without text or without a sender are
    /// ignored.
    pub fn into_inbound(self) -> Option<InboundMessage> {
        let message = self.message?;
        let from = message.from?;
        let text = message.text?;
        Some(InboundMessage {
            user_id: from.id,
            chat_id: message.chat.id,
            first_name: from.first_name,
            text,
        })
    }
}

/// Extracts the text message from a polled update.
pub fn inbound_from_update(update: &Update) -> Option<InboundMessage> {
    let UpdateKind::Message(msg) = &update.kind else {
        return None;
    };
    let user = msg.from.as_ref()?;
    let text = msg.text()?;
    Some(InboundMessage {
        user_id: user.id.0 as i64,
        chat_id: msg.chat.id.0,
        first_name: user.first_name.clone(),
        text: text.to_string(),
    })
}
