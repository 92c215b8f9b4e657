//! Core data models for the Telegram saver bot.
//!
//! This crate provides the plain data types shared by the persistence layer,
//! the assistant core and the Telegram front door: reminders and their due
//! keys, user records with bounded history, todo items, and the closed set of
//! intents returned by the reasoning service.

pub mod intent;
pub mod reminder;
pub mod todo;
pub mod user;

pub use intent::{
    CalendarAction, CalendarRequest, Intent, ReminderRequest, TodoAction, TodoCommand,
    WeatherDay, WeatherRequest,
};
pub use reminder::{DueKey, ParseDueKeyError, Recurrence, Reminder, DUE_TAG};
pub use todo::TodoItem;
pub use user::{HistoryEntry, Preferences, UserRecord, DEFAULT_LANGUAGE, DEFAULT_TIMEZONE, HISTORY_LIMIT};
