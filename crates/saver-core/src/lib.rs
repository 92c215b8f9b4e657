//! Assistant core for the Telegram saver bot.
//!
//! This crate holds everything between the chat transport and the stores:
//! - [`BotConfig`]: configuration built once at startup
//! - [`Assistant`]: sends inbound text to the model and dispatches the
//!   decoded [`Intent`](saver_models::Intent) to the intent handlers
//! - [`ReminderEngine`]: the due-scan that delivers reminders through a
//!   [`Notifier`] and schedules recurring successors
//! - [`dates`]: Persian and Gregorian date display and parsing
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use saver_core::{Assistant, BotConfig, GroqClient, InboundMessage};
//! use saver_persistence::DataStores;
//!
//! # async fn run() -> saver_core::Result<()> {
//! let config = Arc::new(BotConfig::from_env()?);
//! let stores = DataStores::open(&config.data_dir);
//! let model = Arc::new(GroqClient::from_config(&config)?);
//! let assistant = Assistant::new(config, stores, model);
//!
//! let reply = assistant
//!     .respond(&InboundMessage {
//!         user_id: 1,
//!         chat_id: 1,
//!         first_name: "Sara".into(),
//!         text: "فردا ساعت ۹ یادم بنداز برم دکتر".into(),
//!     })
//!     .await;
//! println!("{}", reply);
//! # Ok(())
//! # }
//! ```

pub mod assistant;
pub mod config;
pub mod dates;
pub mod error;
pub mod handlers;
pub mod intent;
pub mod llm;
pub mod messages;
pub mod prompt;
pub mod reminders;

pub use assistant::{Assistant, InboundMessage};
pub use config::BotConfig;
pub use error::{ConfigError, CoreError, Result};
pub use intent::decode_intent;
pub use llm::{ChatMessage, ChatModel, GroqClient};
pub use reminders::{Notifier, ReminderEngine, SweepReport};
