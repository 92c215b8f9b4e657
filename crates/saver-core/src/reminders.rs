//! Reminder due-scan and recurrence engine.
//!
//! A sweep finds every reminder whose due key is at or before "now",
//! attempts delivery, deletes the record whatever the outcome and, for
//! recurring reminders, stores the next occurrence under a new key.
//!
//! Delivery is at-most-once: a failed send is logged and the reminder is
//! still retired, so a user is never notified twice for one occurrence.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use saver_models::{DueKey, Recurrence, Reminder};
use saver_persistence::{DataStores, ReminderStore, UserStore};
use tracing::{debug, error, info, warn};

use crate::dates::{format_persian_date, format_persian_time};
use crate::error::Result;
use crate::messages;

/// Outbound delivery of a text to a chat.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends `text` to `chat_id`. Errors are not retried.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;
}

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Reminders that were due.
    pub found: usize,
    /// Reminders whose notification was sent.
    pub delivered: usize,
    /// Reminders whose notification failed.
    pub failed: usize,
    /// Successors stored for recurring reminders.
    pub rescheduled: usize,
}

/// Delivers due reminders and schedules their successors.
pub struct ReminderEngine {
    reminders: ReminderStore,
    users: UserStore,
    notifier: Arc<dyn Notifier>,
    default_tz: Tz,
}

impl ReminderEngine {
    pub fn new(stores: &DataStores, notifier: Arc<dyn Notifier>, default_tz: Tz) -> Self {
        Self {
            reminders: stores.reminders.clone(),
            users: stores.users.clone(),
            notifier,
            default_tz,
        }
    }

    /// Returns every reminder due at or before `now`.
    pub fn due_reminders(&self, now: DateTime<Utc>) -> Result<Vec<(DueKey, Reminder)>> {
        Ok(self.reminders.due(now.timestamp())?)
    }

    /// Runs one sweep against the wall clock.
    pub async fn run_sweep(&self) -> Result<SweepReport> {
        self.run_sweep_at(Utc::now()).await
    }

    /// Runs one sweep as if the time were `now`.
    pub async fn run_sweep_at(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let due = self.due_reminders(now)?;
        let mut report = SweepReport {
            found: due.len(),
            ..SweepReport::default()
        };

        if !due.is_empty() {
            info!(count = due.len(), "Processing due reminders");
        }

        for (key, reminder) in due {
            self.retire(key, &reminder, now, &mut report).await;
        }

        Ok(report)
    }

    async fn retire(&self, key: DueKey, reminder: &Reminder, now: DateTime<Utc>, report: &mut SweepReport) {
        let text = self.render(reminder, now);
        match self.notifier.send_text(reminder.chat_id, &text).await {
            Ok(()) => {
                report.delivered += 1;
                info!(key = %key, user_id = reminder.user_id, "Reminder delivered");
            }
            Err(e) => {
                report.failed += 1;
                warn!(key = %key, user_id = reminder.user_id, error = %e, "Reminder delivery failed");
            }
        }

        if let Err(e) = self.reminders.delete(key) {
            // The record comes due again next sweep; its successor is
            // scheduled then.
            error!(key = %key, error = %e, "Failed to delete delivered reminder");
            return;
        }

        match reminder.successor(now) {
            Some(next) => self.schedule(next, report),
            None => {
                if let Recurrence::Unrecognized(value) = &reminder.recurrence {
                    debug!(key = %key, recurrence = %value, "Unrecognized recurrence, no successor");
                }
            }
        }
    }

    fn schedule(&self, next: Reminder, report: &mut SweepReport) {
        let Some(key) = next.due_key(self.default_tz) else {
            warn!(user_id = next.user_id, date = %next.date, time = %next.time, "Successor has no due time");
            return;
        };
        match self.reminders.save(key, &next) {
            Ok(()) => {
                report.rescheduled += 1;
                info!(key = %key, recurrence = next.recurrence.as_str(), "Recurring reminder rescheduled");
            }
            Err(e) => error!(key = %key, error = %e, "Failed to store recurring reminder"),
        }
    }

    fn render(&self, reminder: &Reminder, now: DateTime<Utc>) -> String {
        let name = self
            .users
            .load(reminder.user_id)
            .and_then(|u| u.display_name().map(str::to_string));
        let local = reminder
            .local_datetime()
            .unwrap_or_else(|| now.with_timezone(&reminder.tz(self.default_tz)).naive_local());
        messages::reminder_due(
            name.as_deref(),
            &reminder.description,
            &format_persian_date(local.date()),
            &format_persian_time(local.time()),
        )
    }
}
