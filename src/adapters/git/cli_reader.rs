//! Implements RepoMetadataPort by shelling out to the `git` CLI.
//!
//! Read-only queries against HEAD. The tag lookup is allowed to fail (untagged
//! history); every other query is required.

use crate::domain::{DomainError, GitInfo};
use crate::ports::RepoMetadataPort;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// `git` CLI adapter. Runs in `workdir`, or the process CWD when `None`.
pub struct GitCliReader {
    workdir: Option<PathBuf>,
}

impl GitCliReader {
    pub fn new() -> Self {
        Self { workdir: None }
    }

    pub fn in_dir(workdir: impl AsRef<Path>) -> Self {
        Self {
            workdir: Some(workdir.as_ref().to_path_buf()),
        }
    }

    /// Run one git query and return trimmed stdout.
    async fn run(&self, args: &[&str]) -> Result<String, DomainError> {
        let mut cmd = Command::new("git");
        cmd.args(args);
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }

        let output = cmd
            .output()
            .await
            .map_err(|e| DomainError::Git(format!("failed to run git: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            debug!(args = ?args, status = %output.status, %stderr, "git query failed");
            return Err(DomainError::Git(format!(
                "git {} exited with {}: {}",
                args.join(" "),
                output.status,
                stderr
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Default for GitCliReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepoMetadataPort for GitCliReader {
    async fn read(&self) -> Result<GitInfo, DomainError> {
        let commit_hash = self.run(&["rev-parse", "--short=8", "HEAD"]).await?;
        let commit_date = self
            .run(&["log", "-1", "--format=%cd", "--date=short"])
            .await?;
        let author_name = self.run(&["log", "-1", "--format=%an"]).await?;
        let author_email = self.run(&["log", "-1", "--format=%ae"]).await?;
        let branch = self.run(&["rev-parse", "--abbrev-ref", "HEAD"]).await?;
        let latest_tag = self
            .run(&["describe", "--tags", "--abbrev=0"])
            .await
            .ok()
            .filter(|t| !t.is_empty());

        Ok(GitInfo {
            commit_hash,
            commit_date,
            author_name,
            author_email,
            branch,
            latest_tag,
        })
    }
}
