//! Intent handlers.
//!
//! Each handler turns one intent payload into a reply text. Invalid user
//! input yields an explicit reply; only storage failures are errors.

pub mod calendar;
pub mod reminder;
pub mod todo;
pub mod weather;

pub use calendar::handle_calendar;
pub use reminder::{handle_reminder, list_reminders};
pub use todo::handle_todo;
pub use weather::handle_weather;
