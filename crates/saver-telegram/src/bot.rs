//! Bot lifecycle: startup checks, long-running modes and the reminder ticker.

use std::sync::Arc;
use std::time::Duration;

use saver_core::{BotConfig, GroqClient};
use saver_persistence::DataStores;
use teloxide::prelude::*;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, error, info};
use url::Url;

use crate::commands::register_commands;
use crate::error::{Result, TelegramError};
use crate::notifier::TelegramNotifier;
use crate::polling::Poller;
use crate::state::{create_shared_state, SaverState};
use crate::update::IncomingUpdate;
use crate::webhook;

/// Runs a reminder sweep every `period` until shutdown is signalled.
///
/// The first sweep runs immediately.
pub fn spawn_reminder_ticker(
    state: Arc<SaverState>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        debug!(period_ms = period.as_millis(), "starting reminder ticker");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match state.sweep().await {
                        Ok(report) if report.found > 0 => info!(?report, "Reminder sweep finished"),
                        Ok(_) => {}
                        Err(e) => error!(error = %e, "Reminder sweep failed"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        debug!("reminder ticker received shutdown signal");
                        break;
                    }
                }
            }
        }
    })
}

/// The saver bot bound to a Telegram token.
pub struct SaverBot {
    bot: Bot,
    state: Arc<SaverState>,
}

impl SaverBot {
    /// Builds the bot, its reasoning client and its stores from `config`.
    pub fn new(config: BotConfig) -> Result<Self> {
        let bot = Bot::new(config.require_telegram_token()?);
        let model = GroqClient::from_config(&config)?;
        info!(model = model.model(), data_dir = %config.data_dir.display(), "Reasoning client ready");
        let stores = DataStores::open(&config.data_dir);
        let state = create_shared_state(
            Arc::new(config),
            stores,
            Arc::new(model),
            Arc::new(TelegramNotifier::new(bot.clone())),
        );
        Ok(Self { bot, state })
    }

    pub fn state(&self) -> &Arc<SaverState> {
        &self.state
    }

    /// Get the bot's username.
    pub async fn get_me(&self) -> Result<String> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| TelegramError::BotStartFailed(e.to_string()))?;
        Ok(me.username().to_string())
    }

    /// Long-polls for updates with the reminder ticker alongside, until Ctrl+C.
    pub async fn start_polling(&self) -> Result<()> {
        info!("Starting Telegram bot in polling mode...");
        register_commands(&self.bot).await;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let ticker = spawn_reminder_ticker(
            Arc::clone(&self.state),
            self.state.config().reminder_interval,
            shutdown_rx.clone(),
        );

        let mut poller = Poller::new(self.bot.clone(), Arc::clone(&self.state), shutdown_rx);
        let polling = tokio::spawn(async move { poller.run().await });

        tokio::signal::ctrl_c().await?;
        info!("Shutdown requested, finishing current iteration");
        let _ = shutdown_tx.send(true);

        let _ = polling.await;
        let _ = ticker.await;
        Ok(())
    }

    /// Serves the webhook API on the configured port with the reminder ticker
    /// alongside, until Ctrl+C.
    pub async fn start_webhook_server(&self) -> Result<()> {
        let port = self.state.config().port;
        info!(port, "Starting Telegram bot in webhook mode...");
        register_commands(&self.bot).await;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let ticker = spawn_reminder_ticker(
            Arc::clone(&self.state),
            self.state.config().reminder_interval,
            shutdown_rx,
        );

        let served = webhook::serve(port, Arc::clone(&self.state), async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await;

        let _ = shutdown_tx.send(true);
        let _ = ticker.await;
        served
    }

    /// Answers a single update given as JSON text.
    pub async fn handle_payload(&self, payload: &str) -> Result<bool> {
        let update = IncomingUpdate::from_json(payload)?;
        self.state.handle_update(update).await
    }

    /// Registers `url` as the webhook endpoint.
    pub async fn set_webhook(&self, url: &str) -> Result<()> {
        let url = Url::parse(url).map_err(|e| TelegramError::WebhookFailed(format!("{}: {}", url, e)))?;
        self.bot
            .set_webhook(url.clone())
            .await
            .map_err(|e| TelegramError::WebhookFailed(e.to_string()))?;
        info!(url = %url, "Webhook registered");
        Ok(())
    }

    /// Describes the current webhook registration.
    pub async fn webhook_info(&self) -> Result<String> {
        let info = self.bot.get_webhook_info().await?;
        let url = info.url.as_ref().map_or("Not set", |u| u.as_str());
        let mut text = format!(
            "URL: {}\nPending updates: {}",
            url, info.pending_update_count
        );
        if let Some(message) = &info.last_error_message {
            text.push_str(&format!("\nLast error: {}", message));
        }
        Ok(text)
    }
}
