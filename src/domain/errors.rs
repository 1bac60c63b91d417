//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("No files found for patterns: {specs:?}")]
    NoFilesFound { specs: Vec<String> },

    #[error("{} is not a valid directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Nothing to send")]
    NothingToSend,

    #[error("Too many files to send: {count} (a media group holds at most {limit})")]
    TooManyFiles { count: usize, limit: usize },

    #[error("Telegram API returned non-JSON or invalid JSON (status {status}): {body}")]
    InvalidResponse { status: u16, body: String },

    /// Non-200 answer from the Bot API. `body` is the raw response text.
    #[error("Telegram API call failed (HTTP {status}). Response text: {body}")]
    Api { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("File error: {0}")]
    File(String),

    #[error("Git query failed: {0}")]
    Git(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DomainError {
    /// HTTP status carried by transport-level failures, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            DomainError::InvalidResponse { status, .. } | DomainError::Api { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}
