//! Infrastructure adapters. Implement outbound ports.
//!
//! Telegram Bot API, filesystem, git, logging, CLI. Map errors to DomainError.

pub mod cli;
pub mod fs;
pub mod git;
pub mod logging;
pub mod telegram;
