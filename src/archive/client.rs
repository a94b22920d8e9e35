use std::env;
use std::io::Write;
use std::time::Duration;

use reqwest::{Client, Response};
use tracing::{debug, warn};

use super::ArchiveVariant;
use super::types::{DownloadRequest, Document, ErrorBody, HealthResponse, SearchResponse};
use crate::query::SearchQuery;
use crate::query::doc_types::DocTypeOption;

pub const API_URL_ENV: &str = "WBDOCS_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:5000";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(60);
/// Archives are assembled server-side before the first byte arrives.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(600);
const MAX_ARCHIVE_BYTES: u64 = 4 * 1024 * 1024 * 1024;
const ERROR_SNIPPET_CHARS: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Archive service error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Application { status: u16, message: Option<String> },

    #[error("Unexpected response from archive service: {0}")]
    UnexpectedResponse(String),

    #[error("Invalid archive service URL '{0}': must be an http(s) URL")]
    Config(String),

    #[error("Archive too large (>{limit} bytes)")]
    TooLarge { limit: u64 },

    #[error("Could not write archive: {0}")]
    Write(#[from] std::io::Error),
}

impl ArchiveError {
    /// Collapse into the single user-visible message, preferring what the server said.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ArchiveError::Application {
                message: Some(m), ..
            } => m.clone(),
            ArchiveError::Application { message: None, .. } => fallback.to_string(),
            ArchiveError::Network(e) => format!("{fallback}: {e}"),
            ArchiveError::UnexpectedResponse(detail) => format!("{fallback}: {detail}"),
            ArchiveError::Config(_) => self.to_string(),
            ArchiveError::TooLarge { .. } | ArchiveError::Write(_) => format!("{fallback}: {self}"),
        }
    }
}

/// Operations the orchestrators need from the archive service.
/// Implemented by `ArchiveClient`; tests substitute in-memory doubles.
pub trait ArchiveService {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Document>, ArchiveError>;

    /// Stream the archive for `documents` into `out`, returning the bytes written.
    async fn download<W: Write>(
        &self,
        documents: &[Document],
        variant: ArchiveVariant,
        out: &mut W,
    ) -> Result<u64, ArchiveError>;
}

#[derive(Clone)]
pub struct ArchiveClient {
    http: Client,
    base_url: String,
    max_archive_bytes: u64,
}

impl ArchiveClient {
    /// Resolve the base URL from `flag`, then `WBDOCS_API_URL`, then the local default.
    pub fn from_env(http: Client, flag: Option<&str>) -> Result<Self, ArchiveError> {
        let base_url = resolve_base_url(flag, env::var(API_URL_ENV).ok())?;
        debug!(%base_url, "archive service configured");
        Ok(Self {
            http,
            base_url,
            max_archive_bytes: MAX_ARCHIVE_BYTES,
        })
    }

    pub fn with_base_url(http: Client, base_url: &str) -> Result<Self, ArchiveError> {
        Ok(Self {
            http,
            base_url: validate_base_url(base_url)?,
            max_archive_bytes: MAX_ARCHIVE_BYTES,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Live document-type catalog from the service.
    pub async fn document_types(&self) -> Result<Vec<DocTypeOption>, ArchiveError> {
        let response = self
            .http
            .get(self.url("/api/document-types"))
            .header("User-Agent", crate::USER_AGENT)
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ArchiveError::UnexpectedResponse(format!("document types: {e}")))
    }

    /// Returns the service's reported status (`"ok"` when healthy).
    pub async fn health(&self) -> Result<String, ArchiveError> {
        let response = self
            .http
            .get(self.url("/api/health"))
            .header("User-Agent", crate::USER_AGENT)
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body: HealthResponse = serde_json::from_str(&response.text().await?)
            .map_err(|e| ArchiveError::UnexpectedResponse(format!("health: {e}")))?;
        body.status
            .ok_or_else(|| ArchiveError::UnexpectedResponse("health: missing status".into()))
    }
}

impl ArchiveService for ArchiveClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Document>, ArchiveError> {
        let url = self.url(query.endpoint());
        debug!(%url, mode = query.mode(), "sending search request");

        let response = self
            .http
            .post(&url)
            .header("User-Agent", crate::USER_AGENT)
            .json(query)
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(application_error(response).await);
        }

        let text = response.text().await?;
        let body: SearchResponse = serde_json::from_str(&text)
            .map_err(|e| ArchiveError::UnexpectedResponse(format!("invalid search body: {e}")))?;

        if let Some(message) = body.error {
            warn!(%message, "archive service reported an error in a success response");
            return Err(ArchiveError::Application {
                status: status.as_u16(),
                message: Some(message),
            });
        }

        body.documents.ok_or_else(|| {
            ArchiveError::UnexpectedResponse("search body has no `documents` field".into())
        })
    }

    async fn download<W: Write>(
        &self,
        documents: &[Document],
        variant: ArchiveVariant,
        out: &mut W,
    ) -> Result<u64, ArchiveError> {
        let url = self.url(variant.endpoint());
        debug!(%url, documents = documents.len(), "requesting archive");

        let response = self
            .http
            .post(&url)
            .header("User-Agent", crate::USER_AGENT)
            .json(&DownloadRequest { documents })
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await?;
        let mut response = ensure_success(response).await?;

        let limit = self.max_archive_bytes;
        if let Some(len) = response.content_length()
            && len > limit
        {
            warn!(declared = len, limit, "archive exceeds size limit");
            return Err(ArchiveError::TooLarge { limit });
        }

        let mut written: u64 = 0;
        while let Some(chunk) = response.chunk().await? {
            written += chunk.len() as u64;
            if written > limit {
                warn!(received = written, limit, "archive exceeds size limit");
                return Err(ArchiveError::TooLarge { limit });
            }
            out.write_all(&chunk)?;
        }
        out.flush()?;
        debug!(bytes = written, "archive received");
        Ok(written)
    }
}

async fn ensure_success(response: Response) -> Result<Response, ArchiveError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(application_error(response).await)
    }
}

/// Turn a non-2xx response into `Application`, pulling `error` out of a JSON body if present.
async fn application_error(response: Response) -> ArchiveError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty());
    if message.is_none() {
        let snippet: String = text.chars().take(ERROR_SNIPPET_CHARS).collect();
        warn!(%status, body = %snippet, "archive service error (no structured body)");
    } else {
        warn!(%status, "archive service error");
    }
    ArchiveError::Application {
        status: status.as_u16(),
        message,
    }
}

fn resolve_base_url(flag: Option<&str>, env_value: Option<String>) -> Result<String, ArchiveError> {
    let chosen = flag
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .or_else(|| env_value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    validate_base_url(&chosen)
}

fn validate_base_url(raw: &str) -> Result<String, ArchiveError> {
    let parsed = url::Url::parse(raw).map_err(|_| ArchiveError::Config(raw.to_string()))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host().is_some() => {
            Ok(raw.trim().trim_end_matches('/').to_string())
        }
        _ => Err(ArchiveError::Config(raw.to_string())),
    }
}
