//! Reminder creation and listing.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use saver_models::{Reminder, ReminderRequest};
use saver_persistence::ReminderStore;
use tracing::{debug, info};

use crate::dates::{format_persian_date, format_persian_time, parse_date, parse_time, to_persian_digits};
use crate::error::Result;
use crate::messages;

/// Stores a reminder for the request and confirms it.
///
/// Relative and Persian dates are resolved against `now` in `tz`, and the
/// reminder records `tz` so its successors stay in the same zone.
pub fn handle_reminder(
    store: &ReminderStore,
    request: &ReminderRequest,
    user_id: i64,
    chat_id: i64,
    tz: Tz,
    now: DateTime<Utc>,
) -> Result<String> {
    let today = now.with_timezone(&tz).date_naive();
    let (Some(date), Some(time)) = (parse_date(&request.date, today), parse_time(&request.time)) else {
        debug!(user_id, date = %request.date, time = %request.time, "Unusable reminder date or time");
        return Ok(messages::REMINDER_INVALID_DATE.to_string());
    };

    let description = request.description.trim();
    let reminder = Reminder::new(
        user_id,
        chat_id,
        date,
        time,
        description,
        request.recurrence.clone(),
    )
    .with_timezone(tz)
    .with_created(now);

    // Local times skipped by a DST jump have no instant.
    let Some(key) = reminder.due_key(tz) else {
        return Ok(messages::REMINDER_INVALID_DATE.to_string());
    };

    store.save(key, &reminder)?;
    info!(user_id, key = %key, recurrence = reminder.recurrence.as_str(), "Reminder scheduled");

    Ok(messages::reminder_set(
        &format_persian_date(date),
        &format_persian_time(time),
        description,
        &reminder.recurrence,
    ))
}

/// Lists a user's pending reminders in due order.
pub fn list_reminders(store: &ReminderStore, user_id: i64, default_tz: Tz) -> Result<String> {
    let pending = store.for_user(user_id)?;
    if pending.is_empty() {
        return Ok(messages::NO_REMINDERS.to_string());
    }

    let mut text = String::from("🔔 یادآورهای فعال شما:\n\n");
    for (index, (key, reminder)) in pending.iter().enumerate() {
        let tz = reminder.tz(default_tz);
        let when = DateTime::from_timestamp(key.due, 0)
            .map(|due| due.with_timezone(&tz))
            .map(|local| {
                format!(
                    "{} {}",
                    format_persian_date(local.date_naive()),
                    format_persian_time(local.time())
                )
            })
            .unwrap_or_else(|| format!("{} {}", reminder.date, reminder.time));

        text.push_str(&format!(
            "{}. {} ⏰ {}",
            to_persian_digits(&(index + 1).to_string()),
            reminder.description,
            when
        ));
        if let Some(label) = messages::recurrence_label(&reminder.recurrence) {
            text.push_str(&format!(" 🔄 {}", label));
        }
        text.push('\n');
    }
    Ok(text)
}
