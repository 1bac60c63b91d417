//! Application configuration. Bot credentials, API endpoint, timeouts.
//!
//! Read from `TG_DEPLOY_*` environment variables (and `.env`), plus an optional file
//! named by `TG_DEPLOY_CONFIG`. Command-line flags override these values.

use crate::domain::DomainError;
use serde::Deserialize;
use std::time::Duration;

/// HTTP read timeout when neither flag nor config sets one.
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct AppConfig {
    /// Bot token. Read from TG_DEPLOY_BOT_TOKEN.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Target chat id or @channel username. Read from TG_DEPLOY_CHAT_ID.
    #[serde(default)]
    pub chat_id: Option<String>,

    /// Bot API base URL. Read from TG_DEPLOY_API_URL.
    #[serde(default)]
    pub api_url: Option<String>,

    /// HTTP read timeout in seconds. Read from TG_DEPLOY_TIMEOUT_SECS.
    #[serde(default)]
    pub timeout_secs: Option<f64>,

    /// Retries on 429/5xx/transport failures. Read from TG_DEPLOY_MAX_RETRIES.
    #[serde(default)]
    pub max_retries: Option<u32>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        if let Ok(path) = std::env::var("TG_DEPLOY_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        // Environment wins over the file.
        c = c.add_source(config::Environment::with_prefix("TG_DEPLOY").try_parsing(true));
        c.build()?.try_deserialize()
    }

    pub fn timeout_secs_or_default(&self) -> f64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn max_retries_or_default(&self) -> u32 {
        self.max_retries.unwrap_or(0)
    }
}

/// Fully resolved settings for one run (flags merged over [`AppConfig`]).
#[derive(Clone)]
pub struct Settings {
    pub bot_token: String,
    pub chat_id: String,
    pub api_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
}

// Manual Debug so the token never reaches logs.
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Converts a timeout in seconds, rejecting negative, zero and non-finite values.
pub fn timeout_from_secs(secs: f64) -> Result<Duration, DomainError> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(DomainError::Config(format!(
            "timeout must be a positive number of seconds, got {}",
            secs
        )));
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|e| DomainError::Config(format!("timeout {}: {}", secs, e)))
}
