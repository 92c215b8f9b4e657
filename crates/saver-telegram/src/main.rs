//! Telegram saver bot binary.
//!
//! Start the bot with:
//! ```bash
//! TELEGRAM_BOT_TOKEN=xxx GROQ_API_KEY=yyy cargo run -p saver-telegram -- poll
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use saver_core::BotConfig;
use saver_telegram::SaverBot;
use tracing_subscriber::EnvFilter;

/// Persian personal assistant bot for Telegram
#[derive(Parser, Debug)]
#[command(name = "telegram-saver")]
#[command(about = "Persian personal assistant on Telegram: reminders, todos, questions")]
struct Args {
    #[command(subcommand)]
    mode: Mode,

    /// Data directory (overrides SAVER_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Long-poll Telegram for updates
    Poll,
    /// Serve the webhook API
    Serve {
        /// Listen port (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Answer a single update and exit
    Handle {
        /// Update JSON
        #[arg(long, env = "WEBHOOK_PAYLOAD")]
        payload: String,
    },
    /// Run one reminder sweep and exit
    Reminders,
    /// Register the webhook URL with Telegram
    SetWebhook {
        /// Public URL of the /api/webhook endpoint
        url: String,
    },
    /// Show the current webhook registration
    WebhookInfo,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env.local or .env before clap reads env-backed arguments
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());

    let args = Args::parse();

    let filter = match args.verbose {
        0 => "telegram_saver=info,saver_telegram=info,saver_core=info,teloxide=warn",
        1 => "telegram_saver=debug,saver_telegram=debug,saver_core=debug,saver_persistence=debug,teloxide=info",
        2 => "telegram_saver=trace,saver_telegram=trace,saver_core=trace,saver_persistence=trace,teloxide=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = BotConfig::from_env()?;
    if let Some(dir) = args.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Mode::Serve { port: Some(port) } = &args.mode {
        config = config.with_port(*port);
    }

    let bot = SaverBot::new(config)?;

    match args.mode {
        Mode::Poll => {
            announce(&bot).await?;
            bot.start_polling().await?;
        }
        Mode::Serve { .. } => {
            announce(&bot).await?;
            bot.start_webhook_server().await?;
        }
        Mode::Handle { payload } => {
            let answered = bot.handle_payload(&payload).await?;
            tracing::info!(answered, "Update handled");
        }
        Mode::Reminders => {
            let report = bot.state().sweep().await?;
            println!(
                "Reminders: {} due, {} delivered, {} failed, {} rescheduled",
                report.found, report.delivered, report.failed, report.rescheduled
            );
        }
        Mode::SetWebhook { url } => {
            bot.set_webhook(&url).await?;
            println!("Webhook set to {}", url);
        }
        Mode::WebhookInfo => {
            println!("{}", bot.webhook_info().await?);
        }
    }

    Ok(())
}

async fn announce(bot: &SaverBot) -> saver_telegram::Result<()> {
    match bot.get_me().await {
        Ok(username) => {
            tracing::info!(username = %username, "Bot initialized successfully");
            println!("\n[robot] Telegram Saver Bot");
            println!("   Bot: @{}", username);
            println!("   Press Ctrl+C to stop\n");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to get bot info");
            Err(e)
        }
    }
}
