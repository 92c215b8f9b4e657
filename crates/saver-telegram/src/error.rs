//! Error types for the Telegram front door.

use saver_core::{ConfigError, CoreError};
use saver_persistence::PersistenceError;
use thiserror::Error;

/// Errors that can occur in the Telegram front door.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// A required setting is missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failed to start the bot.
    #[error("Failed to start bot: {0}")]
    BotStartFailed(String),

    /// Telegram rejected or failed a request.
    #[error("Telegram API error: {0}")]
    Api(String),

    /// Webhook registration failed.
    #[error("Failed to register webhook: {0}")]
    WebhookFailed(String),

    /// An inbound update could not be decoded.
    #[error("Invalid update payload: {0}")]
    BadUpdate(#[from] serde_json::Error),

    /// Assistant or reminder engine error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Storage error.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for Telegram operations.
pub type Result<T> = std::result::Result<T, TelegramError>;

impl From<teloxide::RequestError> for TelegramError {
    fn from(err: teloxide::RequestError) -> Self {
        TelegramError::Api(err.to_string())
    }
}
