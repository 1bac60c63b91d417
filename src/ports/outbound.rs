//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, FileSelection, GitInfo};
use std::path::PathBuf;

/// Expands a user file selection into concrete paths.
pub trait FileResolverPort: Send + Sync {
    /// Returns a deduplicated list sorted by path string. Never empty on success.
    fn resolve(&self, selection: &FileSelection) -> Result<Vec<PathBuf>, DomainError>;
}

/// Repository metadata provider (e.g. `git` CLI). Read-only.
#[async_trait::async_trait]
pub trait RepoMetadataPort: Send + Sync {
    /// Snapshot of HEAD. A missing tag is `latest_tag: None`, not an error;
    /// any other failed query fails the whole read.
    async fn read(&self) -> Result<GitInfo, DomainError>;
}

/// Telegram media-group transport.
#[async_trait::async_trait]
pub trait MediaGroupGateway: Send + Sync {
    /// Send `files` as one media group with `caption` on the last item.
    ///
    /// Empty and over-limit file lists are rejected before any network call.
    async fn send_media_group(
        &self,
        chat_id: &str,
        files: &[PathBuf],
        caption: &str,
    ) -> Result<(), DomainError>;
}
