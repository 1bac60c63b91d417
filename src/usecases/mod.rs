//! Application use cases. Orchestrate domain logic via ports.

pub mod deploy_service;
pub mod git_info;

pub use deploy_service::{DeployOutcome, DeployRequest, DeployService};
pub use git_info::{GIT_INFO_FALLBACK, GitInfoService};
