//! Long-polling transport.
//!
//! Asks Telegram for updates after the stored cursor, answers each text
//! message and advances the cursor past every update it has seen, whether or
//! not answering it succeeded.

use std::sync::Arc;
use std::time::Duration;

use teloxide::prelude::*;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::state::SaverState;
use crate::update::inbound_from_update;

/// Maximum updates fetched per request.
pub const UPDATE_LIMIT: u8 = 100;

/// Long-poll wait in seconds. Kept below teloxide's default HTTP timeout.
pub const LONG_POLL_TIMEOUT_SECS: u32 = 10;

/// Offset that acknowledges `update_id` and everything before it.
pub fn next_offset(update_id: u32) -> i32 {
    (update_id as i32).saturating_add(1)
}

/// Pulls updates until shutdown is signalled.
pub struct Poller {
    bot: Bot,
    state: Arc<SaverState>,
    shutdown: watch::Receiver<bool>,
    offset: Option<i32>,
}

impl Poller {
    pub fn new(bot: Bot, state: Arc<SaverState>, shutdown: watch::Receiver<bool>) -> Self {
        let offset = state.stores().cursor.load();
        Self {
            bot,
            state,
            shutdown,
            offset,
        }
    }

    /// The offset the next request will use.
    pub fn offset(&self) -> Option<i32> {
        self.offset
    }

    /// Run the polling loop until shutdown signal.
    ///
    /// The flag is checked at the top of each iteration; a request already in
    /// flight is finished first.
    pub async fn run(&mut self) {
        let interval = self.state.config().poll_interval;
        let backoff = self.state.config().poll_error_backoff;

        // getUpdates is refused while a webhook is registered.
        if let Err(e) = self.bot.delete_webhook().await {
            warn!(error = %e, "Failed to delete webhook before polling");
        }

        info!(offset = ?self.offset, "Starting long polling");

        loop {
            if *self.shutdown.borrow() {
                debug!("poller received shutdown signal");
                break;
            }

            let pause = match self.poll_once().await {
                Ok(count) => {
                    if count > 0 {
                        debug!(count, "Processed updates");
                    }
                    interval
                }
                Err(e) => {
                    error!(error = %e, "Polling failed");
                    backoff
                }
            };

            if !self.pause(pause).await {
                break;
            }
        }

        info!("Long polling stopped");
    }

    /// Sleeps for `duration`, waking early on shutdown. Returns false once the
    /// shutdown sender is gone.
    async fn pause(&mut self, duration: Duration) -> bool {
        tokio::select! {
            _ = sleep(duration) => true,
            changed = self.shutdown.changed() => changed.is_ok(),
        }
    }

    /// Fetches and answers one batch. Returns the number of updates seen.
    async fn poll_once(&mut self) -> Result<usize> {
        let mut request = self
            .bot
            .get_updates()
            .limit(UPDATE_LIMIT)
            .timeout(LONG_POLL_TIMEOUT_SECS);
        if let Some(offset) = self.offset {
            request = request.offset(offset);
        }

        let updates = request.await?;
        let count = updates.len();

        for update in updates {
            if let Some(message) = inbound_from_update(&update) {
                if let Err(e) = self.state.handle_message(&message).await {
                    warn!(update_id = update.id.0, error = %e, "Failed to answer update");
                }
            }

            let offset = next_offset(update.id.0);
            self.offset = Some(offset);
            if let Err(e) = self.state.stores().cursor.save(offset) {
                warn!(offset, error = %e, "Failed to persist polling cursor");
            }
        }

        Ok(count)
    }
}
