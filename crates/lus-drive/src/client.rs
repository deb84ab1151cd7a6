//! Thin typed wrapper over the Drive v3 `files` API.
//!
//! Listing calls accumulate transparently across `nextPageToken` pages.
//! Failures surface as `Result` here; the catalog layer decides what to
//! swallow.

use std::time::Duration;

use bytes::Bytes;
use reqwest::StatusCode;
use serde::Deserialize;

use lus_core::config::DriveConfig;
use lus_core::{Error, Result};

use crate::auth::{ServiceAccountKey, TokenManager};

/// Mime type Drive uses for true folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One entry from a Drive listing.
#[derive(Debug, Clone, Deserialize)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct FileListResponse {
    #[serde(default)]
    files: Vec<DriveFile>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

enum Credentials {
    /// Normal operation: token fetched and cached per process.
    ServiceAccount(Box<TokenManager>),
    /// A pre-issued token, used by tests and the `check-drive` command when
    /// one is supplied directly.
    Static(String),
}

/// Shared, process-lifetime Drive API client.
///
/// Safe for concurrent use: reqwest's client is internally pooled and the
/// token cache is behind an async mutex.
pub struct DriveClient {
    http: reqwest::Client,
    api_base: String,
    credentials: Credentials,
}

impl DriveClient {
    /// Build a client authenticating with the given service-account key.
    pub fn new(key: ServiceAccountKey, api_base: impl Into<String>) -> Self {
        Self {
            http: build_http_client(),
            api_base: normalize_base(api_base.into()),
            credentials: Credentials::ServiceAccount(Box::new(TokenManager::new(key))),
        }
    }

    /// Build a client from the application config (loads the key from inline
    /// JSON or the key file).
    pub fn from_config(config: &DriveConfig) -> Result<Self> {
        let key = ServiceAccountKey::load(config)?;
        Ok(Self::new(key, config.api_base.clone()))
    }

    /// Build a client that sends a fixed bearer token.
    pub fn with_static_token(api_base: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: build_http_client(),
            api_base: normalize_base(api_base.into()),
            credentials: Credentials::Static(token.into()),
        }
    }

    async fn access_token(&self) -> Result<String> {
        match &self.credentials {
            Credentials::ServiceAccount(manager) => manager.access_token().await,
            Credentials::Static(token) => Ok(token.clone()),
        }
    }

    /// List child folders of `parent_id` (all pages).
    pub async fn list_child_folders(&self, parent_id: &str) -> Result<Vec<DriveFile>> {
        let query = format!(
            "'{parent_id}' in parents and mimeType = '{FOLDER_MIME_TYPE}' and trashed = false"
        );
        self.list_files(&query).await
    }

    /// List child files (not folders) of `parent_id` (all pages).
    pub async fn list_child_files(&self, parent_id: &str) -> Result<Vec<DriveFile>> {
        let query = format!(
            "'{parent_id}' in parents and trashed = false and mimeType != '{FOLDER_MIME_TYPE}'"
        );
        self.list_files(&query).await
    }

    /// Run a `files.list` query, following `nextPageToken` until exhausted.
    async fn list_files(&self, query: &str) -> Result<Vec<DriveFile>> {
        let token = self.access_token().await?;
        let url = format!("{}/drive/v3/files", self.api_base);

        let mut collected = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(&url)
                .bearer_auth(&token)
                .query(&[
                    ("q", query),
                    ("spaces", "drive"),
                    ("fields", "nextPageToken, files(id, name)"),
                ]);
            if let Some(ref t) = page_token {
                request = request.query(&[("pageToken", t.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| Error::drive(format!("listing request failed: {e}")))?;

            if !response.status().is_success() {
                let status = response.status();
                return Err(Error::drive(format!("listing returned HTTP {status}")));
            }

            let page: FileListResponse = response
                .json()
                .await
                .map_err(|e| Error::drive(format!("listing response parse failed: {e}")))?;

            collected.extend(page.files);

            match page.next_page_token {
                Some(t) => page_token = Some(t),
                None => break,
            }
        }

        Ok(collected)
    }

    /// Fetch one byte range of a file via `alt=media`.
    ///
    /// Returns `Ok(None)` when the requested range starts at or past the end
    /// of the file (HTTP 416), which the streaming relay treats as a clean
    /// end of stream.
    pub async fn fetch_range(&self, file_id: &str, start: u64, len: u64) -> Result<Option<Bytes>> {
        let token = self.access_token().await?;
        let url = format!("{}/drive/v3/files/{file_id}", self.api_base);
        let end = start + len - 1;

        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .query(&[("alt", "media")])
            .header(reqwest::header::RANGE, format!("bytes={start}-{end}"))
            .send()
            .await
            .map_err(|e| Error::drive(format!("download request failed: {e}")))?;

        if response.status() == StatusCode::RANGE_NOT_SATISFIABLE {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            return Err(Error::drive(format!("download returned HTTP {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::drive(format!("download body read failed: {e}")))?;

        Ok(Some(bytes))
    }
}

fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build HTTP client with timeout: {e}");
            reqwest::Client::new()
        })
}

fn normalize_base(base: String) -> String {
    base.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = DriveClient::with_static_token("http://localhost:1234/", "tok");
        assert_eq!(client.api_base, "http://localhost:1234");
    }

    #[test]
    fn file_list_response_defaults_to_empty() {
        let page: FileListResponse = serde_json::from_str("{}").unwrap();
        assert!(page.files.is_empty());
        assert!(page.next_page_token.is_none());
    }
}
