//! State shared by every transport.

use std::sync::Arc;

use saver_core::{Assistant, BotConfig, ChatModel, InboundMessage, Notifier, ReminderEngine, SweepReport};
use saver_persistence::DataStores;
use tracing::{debug, info};

use crate::error::Result;
use crate::update::IncomingUpdate;

/// Assistant, reminder engine and outbound channel behind one handle.
pub struct SaverState {
    config: Arc<BotConfig>,
    stores: DataStores,
    assistant: Assistant,
    engine: ReminderEngine,
    notifier: Arc<dyn Notifier>,
}

impl SaverState {
    pub fn new(
        config: Arc<BotConfig>,
        stores: DataStores,
        model: Arc<dyn ChatModel>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let assistant = Assistant::new(Arc::clone(&config), stores.clone(), model);
        let engine = ReminderEngine::new(&stores, Arc::clone(&notifier), config.timezone);
        Self {
            config,
            stores,
            assistant,
            engine,
            notifier,
        }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn stores(&self) -> &DataStores {
        &self.stores
    }

    /// Answers one inbound message and sends the reply to its chat.
    pub async fn handle_message(&self, message: &InboundMessage) -> Result<()> {
        info!(
            user_id = message.user_id,
            chat_id = message.chat_id,
            "Processing message"
        );
        let reply = self.assistant.respond(message).await;
        self.notifier.send_text(message.chat_id, &reply).await?;
        Ok(())
    }

    /// Handles a decoded update. Returns whether it carried a text message.
    pub async fn handle_update(&self, update: IncomingUpdate) -> Result<bool> {
        let update_id = update.update_id;
        match update.into_inbound() {
            Some(message) => {
                self.handle_message(&message).await?;
                Ok(true)
            }
            None => {
                debug!(update_id, "Ignoring update without text message");
                Ok(false)
            }
        }
    }

    /// Runs one reminder sweep.
    pub async fn sweep(&self) -> Result<SweepReport> {
        Ok(self.engine.run_sweep().await?)
    }
}

/// Wraps state for sharing across tasks and handlers.
pub fn create_shared_state(
    config: Arc<BotConfig>,
    stores: DataStores,
    model: Arc<dyn ChatModel>,
    notifier: Arc<dyn Notifier>,
) -> Arc<SaverState> {
    Arc::new(SaverState::new(config, stores, model, notifier))
}
