//! HTTP client for the companion fact-generation endpoint.
//!
//! Wraps `POST <generator_url>` (generate or fetch facts for a media
//! item) and `GET /health` on the same origin using [`reqwest`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::wire::{parse_generate_response, GenerateRequest, GenerateResponse, WireError};

/// Errors from the generation endpoint.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// The HTTP request itself failed (connection refused, DNS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint returned something other than 200.
    #[error("generator error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 200 response whose body could not be parsed.
    #[error("malformed generator response: {0}")]
    Parse(#[from] WireError),

    /// The configured endpoint is not a usable URL.
    #[error("invalid generator URL: {0}")]
    InvalidUrl(String),
}

/// Something that can produce an annotation set for a media item.
#[async_trait]
pub trait AnnotationGenerator: Send + Sync {
    async fn generate(&self, media_id: &str, title: &str)
        -> Result<GenerateResponse, GeneratorError>;
}

/// Body of `GET /health`.
#[derive(Debug, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

/// HTTP client for one generation endpoint.
pub struct GeneratorApi {
    client: reqwest::Client,
    endpoint: String,
}

impl GeneratorApi {
    /// Create a client for `endpoint` (e.g. `http://localhost:5000/generate-facts`).
    ///
    /// Generation can take a long time upstream, so `timeout` is usually
    /// much longer than the cache timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Probe `GET /health` on the generator's origin.
    pub async fn health(&self) -> Result<HealthStatus, GeneratorError> {
        let mut url = reqwest::Url::parse(&self.endpoint)
            .map_err(|e| GeneratorError::InvalidUrl(format!("{}: {e}", self.endpoint)))?;
        url.set_path("/health");
        url.set_query(None);

        let response = self.client.get(url).send().await?;
        let response = Self::ensure_ok(response).await?;
        Ok(response.json::<HealthStatus>().await?)
    }

    // ---- private helpers ----

    /// Return the response unchanged on 200, or a
    /// [`GeneratorError::Status`] carrying the status and body text.
    async fn ensure_ok(response: reqwest::Response) -> Result<reqwest::Response, GeneratorError> {
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GeneratorError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl AnnotationGenerator for GeneratorApi {
    async fn generate(
        &self,
        media_id: &str,
        title: &str,
    ) -> Result<GenerateResponse, GeneratorError> {
        let request = GenerateRequest {
            video_id: media_id,
            title,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let response = Self::ensure_ok(response).await?;
        let body = response.text().await?;
        Ok(parse_generate_response(&body)?)
    }
}
