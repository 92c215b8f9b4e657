//! Telegram front door for the saver bot.
//!
//! Two alternative transports feed the same assistant:
//!
//! - **Long polling** ([`Poller`]): pulls updates after a persisted cursor.
//! - **Webhook** ([`webhook`]): an axum server receiving one update per
//!   request, or a single payload handled once and exited.
//!
//! Long-running modes also run the reminder sweep on a fixed interval.
//!
//! # Environment Variables
//!
//! Required:
//! - `TELEGRAM_BOT_TOKEN`: Bot token from @BotFather
//! - `GROQ_API_KEY`: Groq API key
//!
//! Optional:
//! - `GROQ_MODEL`, `GROQ_API_URL`: Reasoning service overrides
//! - `SAVER_DATA_DIR`: Data directory (default `./data`)
//! - `SAVER_TIMEZONE`: Default timezone (default `Asia/Tehran`)
//! - `PORT`: Webhook server port (default 3000)
//!
//! # Example
//!
//! ```no_run
//! use saver_core::BotConfig;
//! use saver_telegram::SaverBot;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bot = SaverBot::new(BotConfig::from_env()?)?;
//!     bot.start_polling().await?;
//!     Ok(())
//! }
//! ```

pub mod bot;
pub mod commands;
pub mod error;
pub mod notifier;
pub mod polling;
pub mod state;
pub mod update;
pub mod webhook;

#[cfg(test)]
pub(crate) mod testing;

pub use bot::{spawn_reminder_ticker, SaverBot};
pub use commands::Command;
pub use error::{Result, TelegramError};
pub use notifier::TelegramNotifier;
pub use polling::Poller;
pub use state::{create_shared_state, SaverState};
pub use update::IncomingUpdate;
