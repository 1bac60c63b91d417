//! Caption metadata from the repository. Degrades to a fixed notice, never fails.

use crate::ports::{RepoMetadataPort, ReportPort};
use std::sync::Arc;

/// Shown instead of commit details when the metadata cannot be read.
pub const GIT_INFO_FALLBACK: &str = "Could not retrieve Git commit info. Are you in a Git repo?";

/// All-or-nothing: any failed required query yields the fallback, never partial data.
pub struct GitInfoService {
    source: Arc<dyn RepoMetadataPort>,
    reporter: Arc<dyn ReportPort>,
}

impl GitInfoService {
    pub fn new(source: Arc<dyn RepoMetadataPort>, reporter: Arc<dyn ReportPort>) -> Self {
        Self { source, reporter }
    }

    /// Multi-line summary of HEAD, or [`GIT_INFO_FALLBACK`] (reported as an error).
    pub async fn summary(&self) -> String {
        match self.source.read().await {
            Ok(info) => info.to_string(),
            Err(e) => {
                self.reporter
                    .error(&format!("{} ({})", GIT_INFO_FALLBACK, e));
                GIT_INFO_FALLBACK.to_string()
            }
        }
    }
}
