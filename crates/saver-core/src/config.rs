//! Bot configuration.
//!
//! A single [`BotConfig`] is built once at process start and handed to every
//! component that needs it; nothing below the binary reads the environment.
//!
//! # Environment Variables
//!
//! - `TELEGRAM_BOT_TOKEN`: Bot API token
//! - `GROQ_API_KEY`: Reasoning service API key
//! - `GROQ_MODEL`: Model identifier (default `llama-3.1-70b-versatile`)
//! - `GROQ_API_URL`: Chat completions endpoint
//! - `SAVER_DATA_DIR`: Data directory (default `./data`)
//! - `SAVER_TIMEZONE`: Default IANA timezone (default `Asia/Tehran`)
//! - `PORT`: Webhook server port (default 3000)

use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;

use crate::error::ConfigError;

/// Environment variable for the Telegram bot token.
pub const TELEGRAM_BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Environment variable for the Groq API key.
pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Environment variable for the Groq model.
pub const GROQ_MODEL_ENV: &str = "GROQ_MODEL";

/// Environment variable for the Groq endpoint.
pub const GROQ_API_URL_ENV: &str = "GROQ_API_URL";

/// Environment variable for the data directory.
pub const DATA_DIR_ENV: &str = "SAVER_DATA_DIR";

/// Environment variable for the default timezone.
pub const TIMEZONE_ENV: &str = "SAVER_TIMEZONE";

/// Environment variable for the webhook server port.
pub const PORT_ENV: &str = "PORT";

/// Default reasoning model.
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-70b-versatile";

/// Default chat completions endpoint.
pub const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_PORT: u16 = 3000;

/// Configuration shared by every part of the bot.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot token.
    pub telegram_token: Option<String>,
    /// Groq API key.
    pub groq_api_key: Option<String>,
    /// Groq model identifier.
    pub groq_model: String,
    /// Groq chat completions endpoint.
    pub groq_api_url: String,
    /// Root of the on-disk stores.
    pub data_dir: PathBuf,
    /// Timezone used when a user has none.
    pub timezone: Tz,
    /// Webhook server port.
    pub port: u16,
    /// Maximum history entries kept per user.
    pub history_limit: usize,
    /// Past exchanges sent to the model as context.
    pub context_turns: usize,
    /// Pause between polling iterations.
    pub poll_interval: Duration,
    /// Pause after a failed polling iteration.
    pub poll_error_backoff: Duration,
    /// How often the reminder sweep runs in long-lived modes.
    pub reminder_interval: Duration,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling mass.
    pub top_p: f32,
    /// Completion length limit.
    pub max_tokens: u32,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            telegram_token: None,
            groq_api_key: None,
            groq_model: DEFAULT_GROQ_MODEL.to_string(),
            groq_api_url: DEFAULT_GROQ_API_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            timezone: chrono_tz::Asia::Tehran,
            port: DEFAULT_PORT,
            history_limit: saver_models::HISTORY_LIMIT,
            context_turns: 5,
            poll_interval: Duration::from_secs(2),
            poll_error_backoff: Duration::from_secs(5),
            reminder_interval: Duration::from_secs(60),
            temperature: 0.2,
            top_p: 0.8,
            max_tokens: 1024,
        }
    }
}

impl BotConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the config from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        config.telegram_token = get(TELEGRAM_BOT_TOKEN_ENV);
        config.groq_api_key = get(GROQ_API_KEY_ENV);
        if let Some(model) = get(GROQ_MODEL_ENV) {
            config.groq_model = model;
        }
        if let Some(url) = get(GROQ_API_URL_ENV) {
            config.groq_api_url = url;
        }
        if let Some(dir) = get(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(tz) = get(TIMEZONE_ENV) {
            config.timezone = tz.trim().parse().map_err(|_| ConfigError::Invalid {
                name: TIMEZONE_ENV,
                value: tz.clone(),
            })?;
        }
        if let Some(port) = get(PORT_ENV) {
            config.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                name: PORT_ENV,
                value: port.clone(),
            })?;
        }

        Ok(config)
    }

    /// Returns the Telegram token or an error naming the missing variable.
    pub fn require_telegram_token(&self) -> Result<&str, ConfigError> {
        self.telegram_token
            .as_deref()
            .ok_or(ConfigError::Missing(TELEGRAM_BOT_TOKEN_ENV))
    }

    /// Returns the Groq API key or an error naming the missing variable.
    pub fn require_groq_api_key(&self) -> Result<&str, ConfigError> {
        self.groq_api_key
            .as_deref()
            .ok_or(ConfigError::Missing(GROQ_API_KEY_ENV))
    }

    /// Sets the Telegram token.
    pub fn with_telegram_token(mut self, token: impl Into<String>) -> Self {
        self.telegram_token = Some(token.into());
        self
    }

    /// Sets the Groq API key.
    pub fn with_groq_api_key(mut self, key: impl Into<String>) -> Self {
        self.groq_api_key = Some(key.into());
        self
    }

    /// Sets the Groq endpoint.
    pub fn with_groq_api_url(mut self, url: impl Into<String>) -> Self {
        self.groq_api_url = url.into();
        self
    }

    /// Sets the data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Sets the default timezone.
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = tz;
        self
    }

    /// Sets the webhook port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the per-user history limit, capped at
    /// [`saver_models::HISTORY_LIMIT`].
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.min(saver_models::HISTORY_LIMIT);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = BotConfig::default();

        assert_eq!(config.groq_model, "llama-3.1-70b-versatile");
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.timezone, chrono_tz::Asia::Tehran);
        assert_eq!(config.port, 3000);
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.context_turns, 5);
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.poll_error_backoff, Duration::from_secs(5));
        assert_eq!(config.reminder_interval, Duration::from_secs(60));
        assert_eq!(config.max_tokens, 1024);
    }

    #[test]
    fn test_from_lookup() {
        let config = BotConfig::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("GROQ_API_KEY", "gsk"),
            ("SAVER_DATA_DIR", "/var/lib/saver"),
            ("SAVER_TIMEZONE", "Europe/Berlin"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.require_telegram_token().unwrap(), "123:abc");
        assert_eq!(config.require_groq_api_key().unwrap(), "gsk");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/saver"));
        assert_eq!(config.timezone, chrono_tz::Europe::Berlin);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_missing_secrets() {
        let config = BotConfig::from_lookup(lookup(&[("GROQ_API_KEY", "  ")])).unwrap();

        assert_eq!(
            config.require_telegram_token(),
            Err(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))
        );
        assert_eq!(
            config.require_groq_api_key(),
            Err(ConfigError::Missing("GROQ_API_KEY"))
        );
    }

    #[test]
    fn test_invalid_values() {
        let err = BotConfig::from_lookup(lookup(&[("SAVER_TIMEZONE", "Mars/Olympus")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "SAVER_TIMEZONE", .. }));

        let err = BotConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn test_config_builder() {
        let config = BotConfig::new()
            .with_data_dir("/tmp/x")
            .with_port(8443)
            .with_history_limit(3);

        assert_eq!(config.data_dir, PathBuf::from("/tmp/x"));
        assert_eq!(config.port, 8443);
        assert_eq!(config.history_limit, 3);
    }

    #[test]
    fn test_history_limit_is_capped() {
        let config = BotConfig::new().with_history_limit(500);
        assert_eq!(config.history_limit, saver_models::HISTORY_LIMIT);
    }
}
