//! Map Bot API HTTP responses to domain results.
//!
//! Telegram answers with `{"ok": bool, "description"?, "parameters"?}`. Any JSON body is
//! accepted on 200; the typed view is only used to pull retry hints out of errors.

use crate::domain::DomainError;
use serde::Deserialize;
use std::time::Duration;

/// Longest backoff between retries when Telegram gives no `retry_after`.
const MAX_BACKOFF_SECS: u64 = 60;

/// The part of a Telegram error body that carries retry hints.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseParameters {
    #[serde(default)]
    pub retry_after: Option<u64>,
}

/// Non-JSON bodies fail first (whatever the status), then any status other than 200.
pub fn interpret(status: u16, body: &str) -> Result<(), DomainError> {
    if serde_json::from_str::<serde_json::Value>(body).is_err() {
        return Err(DomainError::InvalidResponse {
            status,
            body: body.to_string(),
        });
    }
    if status != 200 {
        return Err(DomainError::Api {
            status,
            body: body.to_string(),
        });
    }
    Ok(())
}

/// `parameters.retry_after` from a Telegram error body.
pub fn retry_after(body: &str) -> Option<u64> {
    serde_json::from_str::<ApiResponse>(body)
        .ok()
        .and_then(|r| r.parameters)
        .and_then(|p| p.retry_after)
}

/// Rate limiting, server-side failures and transport errors are worth another attempt.
pub fn is_retryable(err: &DomainError) -> bool {
    match err {
        DomainError::Transport(_) => true,
        DomainError::Api { status, .. } | DomainError::InvalidResponse { status, .. } => {
            *status == 429 || *status >= 500
        }
        _ => false,
    }
}

/// Telegram's `retry_after` when given, else `2^attempt` seconds (capped).
pub fn retry_delay(err: &DomainError, attempt: u32) -> Duration {
    if let DomainError::Api { body, .. } = err {
        if let Some(secs) = retry_after(body) {
            return Duration::from_secs(secs);
        }
    }
    let secs = 1u64
        .checked_shl(attempt)
        .unwrap_or(MAX_BACKOFF_SECS)
        .min(MAX_BACKOFF_SECS);
    Duration::from_secs(secs)
}
