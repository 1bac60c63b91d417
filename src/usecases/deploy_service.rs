//! Main deploy flow: resolve files -> build caption -> send one media group.
//!
//! - Resolution and send preconditions fail before any network call
//! - Git metadata is optional and never fails the run
//! - Every failure is reported once, here, before it is returned

use crate::domain::{CAPTION_LIMIT, DomainError, FileSelection};
use crate::ports::{FileResolverPort, MediaGroupGateway, RepoMetadataPort, ReportPort};
use crate::usecases::GitInfoService;
use std::path::PathBuf;
use std::sync::Arc;

/// One upload, as requested on the command line.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub chat_id: String,
    pub selection: FileSelection,
    /// Caption prefix; a newline is always appended.
    pub message: String,
    pub add_git_info: bool,
}

/// What was sent.
#[derive(Debug, Clone)]
pub struct DeployOutcome {
    pub files: Vec<PathBuf>,
    pub caption: String,
}

/// Deploy service. Coordinates resolver, metadata and gateway.
pub struct DeployService {
    resolver: Arc<dyn FileResolverPort>,
    gateway: Arc<dyn MediaGroupGateway>,
    git_info: GitInfoService,
    reporter: Arc<dyn ReportPort>,
}

impl DeployService {
    pub fn new(
        resolver: Arc<dyn FileResolverPort>,
        gateway: Arc<dyn MediaGroupGateway>,
        metadata: Arc<dyn RepoMetadataPort>,
        reporter: Arc<dyn ReportPort>,
    ) -> Self {
        Self {
            resolver,
            gateway,
            git_info: GitInfoService::new(metadata, Arc::clone(&reporter)),
            reporter,
        }
    }

    pub async fn deploy(&self, request: &DeployRequest) -> Result<DeployOutcome, DomainError> {
        let result = self.run(request).await;
        if let Err(e) = &result {
            self.reporter.error(&e.to_string());
        }
        result
    }

    async fn run(&self, request: &DeployRequest) -> Result<DeployOutcome, DomainError> {
        let files = self.resolver.resolve(&request.selection)?;
        let listed: Vec<String> = files.iter().map(|p| p.display().to_string()).collect();
        self.reporter.info(&format!(
            "Resolved {} file(s): {}",
            files.len(),
            listed.join(", ")
        ));

        let caption = self.caption(request).await;
        let caption_len = caption.chars().count();
        if caption_len > CAPTION_LIMIT {
            self.reporter.warn(&format!(
                "Caption is {} characters; Telegram accepts at most {}",
                caption_len, CAPTION_LIMIT
            ));
        }

        self.gateway
            .send_media_group(&request.chat_id, &files, &caption)
            .await?;

        Ok(DeployOutcome { files, caption })
    }

    /// `"{message}\n"`, followed by the repository summary when requested.
    pub async fn caption(&self, request: &DeployRequest) -> String {
        let mut caption = format!("{}\n", request.message);
        if request.add_git_info {
            caption.push_str(&self.git_info.summary().await);
        }
        caption
    }
}
