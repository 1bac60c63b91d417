//! tg-deploy: upload build artifacts to Telegram as one media group, with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
