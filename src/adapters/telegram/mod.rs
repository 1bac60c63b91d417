//! Telegram Bot API adapter. Implements MediaGroupGateway.

pub mod bot_api;
pub mod response;

pub use bot_api::{BotApiGateway, DEFAULT_API_URL};
