//! Command menu registered with Telegram.
//!
//! The commands themselves are answered by the assistant; this enum only
//! feeds `set_my_commands` so clients show them in the menu.

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

/// Bot commands.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "دستورات ربات:")]
pub enum Command {
    #[command(description = "شروع و خوش‌آمدگویی")]
    Start,
    #[command(description = "راهنمای استفاده")]
    Help,
    #[command(description = "یادآورهای فعال")]
    Reminders,
}

/// Publishes the command menu. Failures are logged, not fatal.
pub async fn register_commands(bot: &Bot) {
    match bot.set_my_commands(Command::bot_commands()).await {
        Ok(_) => info!("Command menu registered"),
        Err(e) => warn!(error = %e, "Failed to register command menu"),
    }
}
