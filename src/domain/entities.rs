//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/process types here. Adapters build these or consume them.

use crate::domain::DomainError;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Upper bound of items in one `sendMediaGroup` call.
pub const MAX_MEDIA_GROUP_SIZE: usize = 10;

/// Caption length limit enforced by Telegram (characters, after entity parsing).
pub const CAPTION_LIMIT: usize = 1024;

/// Pattern used by directory mode when the caller gives none.
pub const DEFAULT_DIRECTORY_PATTERN: &str = "*.bin";

/// Tag placeholder when HEAD has no reachable tag.
pub const NOT_TAGGED: &str = "not tagged";

/// How the user selected the files to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelection {
    /// Literal paths and glob patterns. Relative ones are expanded against `base_dir`
    /// (or the working directory when `None`).
    Specs {
        specs: Vec<String>,
        base_dir: Option<PathBuf>,
    },
    /// Files directly inside `dir` whose name matches any of `patterns`.
    Directory { dir: PathBuf, patterns: Vec<String> },
}

impl FileSelection {
    pub fn specs(specs: Vec<String>) -> Self {
        FileSelection::Specs {
            specs,
            base_dir: None,
        }
    }

    /// Directory mode; empty `patterns` falls back to `*.bin`.
    pub fn directory(dir: impl Into<PathBuf>, patterns: Vec<String>) -> Self {
        let patterns = if patterns.is_empty() {
            vec![DEFAULT_DIRECTORY_PATTERN.to_string()]
        } else {
            patterns
        };
        FileSelection::Directory {
            dir: dir.into(),
            patterns,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Document,
}

/// One entry of the `media` JSON array of `sendMediaGroup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaDescriptor {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// `attach://<field>` reference to a multipart part of the same request.
    pub media: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// A file bound to its multipart field and JSON descriptor.
#[derive(Debug, Clone)]
pub struct MediaItem {
    pub field: String,
    pub path: PathBuf,
    pub descriptor: MediaDescriptor,
}

/// Validated media group: 1..=10 documents, caption on the last one only.
#[derive(Debug, Clone)]
pub struct MediaGroup {
    items: Vec<MediaItem>,
}

impl MediaGroup {
    /// Build the group in file order. Fields are numbered `file1..fileN`.
    ///
    /// # Errors
    /// `NothingToSend` for an empty list, `TooManyFiles` above the Telegram limit.
    pub fn new(files: &[PathBuf], caption: &str) -> Result<Self, DomainError> {
        if files.is_empty() {
            return Err(DomainError::NothingToSend);
        }
        if files.len() > MAX_MEDIA_GROUP_SIZE {
            return Err(DomainError::TooManyFiles {
                count: files.len(),
                limit: MAX_MEDIA_GROUP_SIZE,
            });
        }

        let last = files.len() - 1;
        let items = files
            .iter()
            .enumerate()
            .map(|(idx, path)| {
                let field = format!("file{}", idx + 1);
                MediaItem {
                    descriptor: MediaDescriptor {
                        kind: MediaKind::Document,
                        media: format!("attach://{}", field),
                        caption: (idx == last).then(|| caption.to_string()),
                    },
                    field,
                    path: path.clone(),
                }
            })
            .collect();

        Ok(Self { items })
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &MediaDescriptor> {
        self.items.iter().map(|i| &i.descriptor)
    }

    /// The `media` form field: the descriptor array as strict JSON.
    pub fn media_json(&self) -> Result<String, DomainError> {
        let descriptors: Vec<&MediaDescriptor> = self.descriptors().collect();
        serde_json::to_string(&descriptors).map_err(|e| DomainError::Serialization(e.to_string()))
    }
}

/// Snapshot of the checkout's HEAD. Read fresh per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitInfo {
    pub commit_hash: String,
    pub commit_date: String,
    pub author_name: String,
    pub author_email: String,
    pub branch: String,
    /// Nearest reachable tag; `None` renders as "not tagged".
    pub latest_tag: Option<String>,
}

impl fmt::Display for GitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "VCS commit: {}", self.commit_hash)?;
        writeln!(f, "Commit date: {}", self.commit_date)?;
        writeln!(f, "Author: {} <{}>", self.author_name, self.author_email)?;
        writeln!(f, "Branch: {}", self.branch)?;
        write!(
            f,
            "Latest Tag: {}",
            self.latest_tag.as_deref().unwrap_or(NOT_TAGGED)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(n: usize) -> Vec<PathBuf> {
        (0..n).map(|i| PathBuf::from(format!("build/{}.bin", i))).collect()
    }

    #[test]
    fn test_single_file_carries_caption() {
        let group = MediaGroup::new(&paths(1), "release 1.0").unwrap();
        let d: Vec<_> = group.descriptors().collect();
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].media, "attach://file1");
        assert_eq!(d[0].caption.as_deref(), Some("release 1.0"));
    }

    #[test]
    fn test_caption_only_on_last_descriptor() {
        let group = MediaGroup::new(&paths(3), "nightly").unwrap();
        let d: Vec<_> = group.descriptors().collect();
        assert_eq!(d.len(), 3);
        assert!(d[0].caption.is_none());
        assert!(d[1].caption.is_none());
        assert_eq!(d[2].caption.as_deref(), Some("nightly"));
        assert_eq!(group.items()[2].field, "file3");
        assert_eq!(group.items()[2].path, PathBuf::from("build/2.bin"));
    }

    #[test]
    fn test_empty_group_rejected() {
        assert!(matches!(
            MediaGroup::new(&[], "x"),
            Err(DomainError::NothingToSend)
        ));
    }

    #[test]
    fn test_eleven_files_rejected() {
        let err = MediaGroup::new(&paths(11), "x").unwrap_err();
        assert!(matches!(
            err,
            DomainError::TooManyFiles {
                count: 11,
                limit: 10
            }
        ));
        assert!(MediaGroup::new(&paths(10), "x").is_ok());
    }

    #[test]
    fn test_media_json_is_strict_json() {
        let group = MediaGroup::new(&paths(2), "it's \"quoted\"\nline").unwrap();
        let json = group.media_json().unwrap();
        assert_eq!(
            json,
            r#"[{"type":"document","media":"attach://file1"},{"type":"document","media":"attach://file2","caption":"it's \"quoted\"\nline"}]"#
        );
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[1]["caption"], "it's \"quoted\"\nline");
    }

    #[test]
    fn test_directory_selection_defaults_to_bin() {
        let sel = FileSelection::directory("build/release", vec![]);
        assert_eq!(
            sel,
            FileSelection::Directory {
                dir: PathBuf::from("build/release"),
                patterns: vec!["*.bin".to_string()],
            }
        );
    }

    #[test]
    fn test_git_info_summary() {
        let info = GitInfo {
            commit_hash: "1a2b3c4d".into(),
            commit_date: "2024-05-01".into(),
            author_name: "Jane".into(),
            author_email: "jane@example.com".into(),
            branch: "main".into(),
            latest_tag: None,
        };
        assert_eq!(
            info.to_string(),
            "VCS commit: 1a2b3c4d\nCommit date: 2024-05-01\nAuthor: Jane <jane@example.com>\nBranch: main\nLatest Tag: not tagged"
        );
    }
}
