//! Command-line interface. Parses flags into a DeployRequest and run Settings.

use crate::adapters::telegram::DEFAULT_API_URL;
use crate::domain::{DomainError, FileSelection};
use crate::shared::config::{AppConfig, Settings, timeout_from_secs};
use crate::usecases::DeployRequest;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// Send a group of build artifacts to a Telegram chat using a bot token.
#[derive(Parser, Debug)]
#[command(name = "tg-deploy", version, about)]
#[command(group(
    ArgGroup::new("selection")
        .required(true)
        .args(["files", "directory"])
))]
pub struct Cli {
    /// Telegram bot token [env: TG_DEPLOY_BOT_TOKEN]
    #[arg(long)]
    pub bot_token: Option<String>,

    /// Telegram chat ID [env: TG_DEPLOY_CHAT_ID]
    #[arg(long, allow_hyphen_values = true)]
    pub chat_id: Option<String>,

    /// File paths or glob patterns (e.g. "build/*.bin" "firmware.elf")
    #[arg(long, num_args = 1..)]
    pub files: Vec<String>,

    /// Base directory for relative --files entries (default: current directory)
    #[arg(long, requires = "files")]
    pub base_dir: Option<PathBuf>,

    /// Upload the files directly inside this directory
    #[arg(long)]
    pub directory: Option<PathBuf>,

    /// File-name patterns for --directory [default: *.bin]
    #[arg(long, num_args = 1.., requires = "directory")]
    pub patterns: Vec<String>,

    /// Message placed in the caption of the last file
    #[arg(long, default_value = " ", allow_hyphen_values = true)]
    pub message: String,

    /// Append latest commit info to the caption (true/1/yes/on)
    #[arg(long, default_value = "false")]
    pub add_git_info: String,

    /// HTTP read timeout in seconds [default: 30]
    #[arg(long)]
    pub timeout: Option<f64>,

    /// Retries on rate limiting, server and network errors [default: 0]
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Bot API base URL [default: https://api.telegram.org]
    #[arg(long)]
    pub api_url: Option<String>,
}

impl Cli {
    pub fn selection(&self) -> FileSelection {
        match &self.directory {
            Some(dir) => FileSelection::directory(dir.clone(), self.patterns.clone()),
            None => FileSelection::Specs {
                specs: self.files.clone(),
                base_dir: self.base_dir.clone(),
            },
        }
    }

    /// Merge flags over `cfg`. Token and chat id must come from one of them.
    pub fn settings(&self, cfg: &AppConfig) -> Result<Settings, DomainError> {
        let bot_token = non_empty(self.bot_token.clone().or_else(|| cfg.bot_token.clone()))
            .ok_or_else(|| {
                DomainError::Config("bot token is required (--bot-token or TG_DEPLOY_BOT_TOKEN)".into())
            })?;
        let chat_id = non_empty(self.chat_id.clone().or_else(|| cfg.chat_id.clone()))
            .ok_or_else(|| {
                DomainError::Config("chat id is required (--chat-id or TG_DEPLOY_CHAT_ID)".into())
            })?;
        let api_url = self
            .api_url
            .clone()
            .or_else(|| cfg.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let timeout = timeout_from_secs(self.timeout.unwrap_or(cfg.timeout_secs_or_default()))?;
        let max_retries = self
            .max_retries
            .unwrap_or(cfg.max_retries_or_default());

        Ok(Settings {
            bot_token,
            chat_id,
            api_url,
            timeout,
            max_retries,
        })
    }

    pub fn request(&self, chat_id: String) -> DeployRequest {
        DeployRequest {
            chat_id,
            selection: self.selection(),
            message: self.message.clone(),
            add_git_info: parse_bool_like(&self.add_git_info),
        }
    }
}

/// `true`, `1`, `yes`, `on` (any case, surrounding whitespace ignored). Anything else is false.
pub fn parse_bool_like(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
