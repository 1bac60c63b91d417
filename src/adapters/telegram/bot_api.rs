//! Implements MediaGroupGateway over the Telegram Bot HTTP API (`sendMediaGroup`).
//!
//! One multipart POST per attempt: `chat_id`, `media` (JSON descriptor array) and one
//! streamed part per file. Files are reopened on every attempt and their handles are
//! owned by the request body, so they close when the request finishes or fails.

use crate::adapters::telegram::response;
use crate::domain::{DomainError, MediaGroup};
use crate::ports::{MediaGroupGateway, ReportPort};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Bot API gateway. The token is only ever placed in the request URL, never logged.
pub struct BotApiGateway {
    client: Client,
    api_url: String,
    token: String,
    /// Extra attempts after the first on 429/5xx/transport failures. 0 = no retry.
    max_retries: u32,
    reporter: Arc<dyn ReportPort>,
}

impl BotApiGateway {
    /// Create a gateway. `timeout` bounds connecting and each read from the socket.
    pub fn new(
        token: impl Into<String>,
        timeout: Duration,
        reporter: Arc<dyn ReportPort>,
    ) -> Result<Self, DomainError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(|e| DomainError::Transport(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            client,
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            max_retries: 0,
            reporter,
        })
    }

    /// Point at another Bot API server (self-hosted, or a mock in tests).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMediaGroup", self.api_url, self.token)
    }

    async fn build_form(chat_id: &str, group: &MediaGroup) -> Result<Form, DomainError> {
        let mut form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("media", group.media_json()?);
        for item in group.items() {
            form = form.part(item.field.clone(), file_part(&item.path).await?);
        }
        Ok(form)
    }

    async fn post_once(&self, chat_id: &str, group: &MediaGroup) -> Result<(), DomainError> {
        let form = Self::build_form(chat_id, group).await?;

        let response = self
            .client
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        debug!(status, body_len = body.len(), "sendMediaGroup answered");

        response::interpret(status, &body)
    }
}

/// reqwest errors embed the URL, which carries the token. The cause chain does not.
fn transport_error(e: reqwest::Error) -> DomainError {
    let e = e.without_url();
    let mut message = e.to_string();
    let mut source = std::error::Error::source(&e);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    DomainError::Transport(message)
}

/// Streamed multipart part named after the file's base name.
async fn file_part(path: &Path) -> Result<Part, DomainError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| DomainError::File(format!("open {}: {}", path.display(), e)))?;
    let len = file
        .metadata()
        .await
        .map_err(|e| DomainError::File(format!("stat {}: {}", path.display(), e)))?
        .len();
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string();

    Ok(Part::stream_with_length(Body::from(file), len).file_name(file_name))
}

#[async_trait]
impl MediaGroupGateway for BotApiGateway {
    async fn send_media_group(
        &self,
        chat_id: &str,
        files: &[PathBuf],
        caption: &str,
    ) -> Result<(), DomainError> {
        let group = MediaGroup::new(files, caption)?;
        debug!(
            chat_id,
            count = group.len(),
            url = %format!("{}/bot<redacted>/sendMediaGroup", self.api_url),
            "sending media group"
        );

        let mut attempt = 0u32;
        loop {
            match self.post_once(chat_id, &group).await {
                Ok(()) => {
                    self.reporter
                        .info(&format!("Files have been sent ({} documents).", group.len()));
                    return Ok(());
                }
                Err(e) if attempt < self.max_retries && response::is_retryable(&e) => {
                    let wait = response::retry_delay(&e, attempt);
                    attempt += 1;
                    self.reporter.warn(&format!(
                        "Attempt {}/{} failed: {}. Retrying in {}s.",
                        attempt,
                        self.max_retries + 1,
                        e,
                        wait.as_secs()
                    ));
                    tokio::time::sleep(wait).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::logging::MemoryReporter;
    use crate::ports::ReportLevel;
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::tempdir;

    const TOKEN: &str = "123456:TEST-TOKEN";
    const ENDPOINT: &str = "/bot123456:TEST-TOKEN/sendMediaGroup";

    fn gateway(server: &MockServer, reporter: Arc<MemoryReporter>) -> BotApiGateway {
        BotApiGateway::new(TOKEN, Duration::from_secs(5), reporter)
            .unwrap()
            .with_api_url(server.base_url())
    }

    fn write_files(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                std::fs::write(&path, format!("contents of {}", name)).unwrap();
                path
            })
            .collect()
    }

    #[tokio::test]
    async fn test_sends_multipart_media_group() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path(ENDPOINT).is_true(|req| {
                let body = String::from_utf8_lossy(req.body().as_ref());
                body.contains("name=\"chat_id\"")
                    && body.contains("-100200300")
                    && body.contains(r#"{"type":"document","media":"attach://file1"}"#)
                    && body.contains(
                        r#"{"type":"document","media":"attach://file2","caption":"build 42"}"#,
                    )
                    && body.contains("name=\"file1\"; filename=\"a.bin\"")
                    && body.contains("name=\"file2\"; filename=\"b.bin\"")
                    && body.contains("contents of a.bin")
                    && body.contains("contents of b.bin")
            });
            then.status(200).json_body(json!({ "ok": true }));
        });

        let dir = tempdir().unwrap();
        let files = write_files(dir.path(), &["a.bin", "b.bin"]);
        let reporter = Arc::new(MemoryReporter::new());

        gateway(&server, reporter.clone())
            .send_media_group("-100200300", &files, "build 42")
            .await
            .unwrap();

        mock.assert_calls(1);
        assert!(reporter.contains(ReportLevel::Info, &["Files have been sent", "2"]));
    }

    #[tokio::test]
    async fn test_bad_request_is_reported_with_status_and_description() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path(ENDPOINT);
            then.status(400)
                .json_body(json!({ "ok": false, "description": "Bad Request" }));
        });

        let dir = tempdir().unwrap();
        let files = write_files(dir.path(), &["a.bin"]);
        let reporter = Arc::new(MemoryReporter::new());

        let err = gateway(&server, reporter.clone())
            .with_max_retries(3)
            .send_media_group("42", &files, "caption")
            .await
            .unwrap_err();

        mock.assert_calls(1);
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("Bad Request"));
        assert!(reporter.messages(ReportLevel::Info).is_empty());
    }

    #[tokio::test]
    async fn test_non_json_body_fails_even_on_200() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path(ENDPOINT);
            then.status(200).body("<html>maintenance</html>");
        });

        let dir = tempdir().unwrap();
        let files = write_files(dir.path(), &["a.bin"]);

        let err = gateway(&server, Arc::new(MemoryReporter::new()))
            .send_media_group("42", &files, "caption")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidResponse { status: 200, .. }));
        assert!(err.to_string().contains("maintenance"));
    }

    #[tokio::test]
    async fn test_too_many_files_rejected_before_network() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({ "ok": true }));
        });

        let dir = tempdir().unwrap();
        let names: Vec<String> = (0..11).map(|i| format!("{}.bin", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let files = write_files(dir.path(), &refs);

        let err = gateway(&server, Arc::new(MemoryReporter::new()))
            .send_media_group("42", &files, "caption")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::TooManyFiles { count: 11, .. }));
        mock.assert_calls(0);
    }

    #[tokio::test]
    async fn test_empty_file_list_rejected_before_network() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({ "ok": true }));
        });

        let err = gateway(&server, Arc::new(MemoryReporter::new()))
            .send_media_group("42", &[], "caption")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NothingToSend));
        mock.assert_calls(0);
    }

    #[tokio::test]
    async fn test_missing_file_fails_without_request() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({ "ok": true }));
        });

        let dir = tempdir().unwrap();
        let files = vec![dir.path().join("gone.bin")];

        let err = gateway(&server, Arc::new(MemoryReporter::new()))
            .send_media_group("42", &files, "caption")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::File(ref m) if m.contains("gone.bin")));
        mock.assert_calls(0);
    }

    #[tokio::test]
    async fn test_transport_error_keeps_cause() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let dir = tempdir().unwrap();
        let files = write_files(dir.path(), &["a.bin"]);

        let reporter = Arc::new(MemoryReporter::new());
        let err = BotApiGateway::new(TOKEN, Duration::from_secs(5), reporter)
            .unwrap()
            .with_api_url(format!("http://127.0.0.1:{}", port))
            .send_media_group("42", &files, "caption")
            .await
            .unwrap_err();

        let DomainError::Transport(message) = err else {
            panic!("expected a transport error, got {:?}", err);
        };
        assert!(message.starts_with("error sending request: "), "{}", message);
        assert!(message.to_lowercase().contains("connect"), "{}", message);
        assert!(!message.contains(TOKEN));
    }

    #[tokio::test]
    async fn test_rate_limit_retried_when_enabled() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path(ENDPOINT);
            then.status(429).json_body(json!({
                "ok": false,
                "error_code": 429,
                "description": "Too Many Requests: retry after 0",
                "parameters": { "retry_after": 0 }
            }));
        });

        let dir = tempdir().unwrap();
        let files = write_files(dir.path(), &["a.bin"]);
        let reporter = Arc::new(MemoryReporter::new());

        let err = gateway(&server, reporter.clone())
            .with_max_retries(2)
            .send_media_group("42", &files, "caption")
            .await
            .unwrap_err();

        mock.assert_calls(3);
        assert_eq!(err.status(), Some(429));
        assert_eq!(reporter.messages(ReportLevel::Warn).len(), 2);
    }

    #[tokio::test]
    async fn test_server_error_not_retried_by_default() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path(ENDPOINT);
            then.status(500)
                .json_body(json!({ "ok": false, "description": "Internal Server Error" }));
        });

        let dir = tempdir().unwrap();
        let files = write_files(dir.path(), &["a.bin"]);

        let err = gateway(&server, Arc::new(MemoryReporter::new()))
            .send_media_group("42", &files, "caption")
            .await
            .unwrap_err();

        mock.assert_calls(1);
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_api_url_trailing_slash_trimmed() {
        let gw = BotApiGateway::new(TOKEN, Duration::from_secs(1), Arc::new(MemoryReporter::new()))
            .unwrap()
            .with_api_url("http://localhost:8081/");
        assert_eq!(
            gw.endpoint(),
            "http://localhost:8081/bot123456:TEST-TOKEN/sendMediaGroup"
        );
    }
}
