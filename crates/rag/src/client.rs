//! HTTP client for the RAG service.
//!
//! Wraps `GET /stats`, `GET /documents` and `DELETE /documents/{filename}`
//! using [`reqwest`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use crate::error::RagError;
use crate::store::{DeleteOutcome, DocumentStore, RagStats, StoredDocument};

/// Default base URL of the RAG service.
pub const DEFAULT_RAG_URL: &str = "http://localhost:8001";

/// Default per-request timeout in seconds.
pub const DEFAULT_RAG_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the RAG service.
#[derive(Debug, Clone)]
pub struct RagConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl RagConfig {
    /// Load from environment variables, falling back to defaults.
    ///
    /// | Env var            | Default                 |
    /// |--------------------|-------------------------|
    /// | `RAG_SERVICE_URL`  | `http://localhost:8001` |
    /// | `RAG_TIMEOUT_SECS` | `30`                    |
    pub fn from_env() -> Self {
        let base_url = std::env::var("RAG_SERVICE_URL").unwrap_or_else(|_| DEFAULT_RAG_URL.into());
        let timeout_secs = std::env::var("RAG_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RAG_TIMEOUT_SECS);
        Self {
            base_url,
            timeout_secs,
        }
    }
}

/// The `/documents` listing, either bare or wrapped in `{"documents": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentsPayload {
    List(Vec<StoredDocument>),
    Wrapped { documents: Vec<StoredDocument> },
}

/// HTTP client for a single RAG service.
#[derive(Debug)]
pub struct RagClient {
    client: reqwest::Client,
    base_url: Url,
}

impl RagClient {
    /// Build a client without contacting the service.
    pub fn new(config: &RagConfig) -> Result<Self, RagError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| RagError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(RagError::InvalidUrl(config.base_url.clone()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Build a client and verify the service answers `GET /stats`.
    pub async fn connect(config: &RagConfig) -> Result<Self, RagError> {
        let client = Self::new(config)?;
        let stats = client.get_stats().await?;
        tracing::info!(
            url = %client.base_url,
            total_chunks = stats.total_chunks,
            unique_documents = stats.unique_documents,
            "Connected to RAG service",
        );
        Ok(client)
    }

    /// Release the client and its pooled connections.
    pub fn shutdown(self) {
        tracing::debug!(url = %self.base_url, "RAG client closed");
    }

    // ---- private helpers ----

    /// `base_url` with `segments` appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RagError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RagError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`RagError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, RagError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(RagError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RagError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl DocumentStore for RagClient {
    async fn get_stats(&self) -> Result<RagStats, RagError> {
        let response = self.client.get(self.endpoint(&["stats"])?).send().await?;
        Self::parse_response(response).await
    }

    async fn get_all_documents(&self) -> Result<Vec<StoredDocument>, RagError> {
        let response = self.client.get(self.endpoint(&["documents"])?).send().await?;
        let payload: DocumentsPayload = Self::parse_response(response).await?;
        Ok(match payload {
            DocumentsPayload::List(documents) | DocumentsPayload::Wrapped { documents } => documents,
        })
    }

    async fn delete_document(&self, filename: &str) -> Result<DeleteOutcome, RagError> {
        let url = self.endpoint(&["documents", filename])?;
        let response = self.client.delete(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(DeleteOutcome::not_found());
        }
        Self::parse_response(response).await
    }
}
