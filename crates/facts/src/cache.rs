//! Read-only client for the shared remote annotation cache.
//!
//! Cached sets live at `<cache_base_url>/<media_id>.json`. Every failure
//! mode here is a cache miss to the resolver; the error variants only
//! exist so misses can be logged with a reason.

use std::time::Duration;

use async_trait::async_trait;
use popup_core::annotation::Annotation;

use crate::wire::{parse_cache_document, WireError};

/// Why a cache lookup produced no annotations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The cache has no document for this id.
    #[error("no cached annotations")]
    NotFound,

    /// The cache answered with some other non-success status.
    #[error("cache returned HTTP {0}")]
    Status(u16),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The document exists but could not be read.
    #[error("malformed cache document: {0}")]
    Parse(#[from] WireError),
}

/// A source of previously published annotation sets.
#[async_trait]
pub trait AnnotationCache: Send + Sync {
    async fn fetch(&self, media_id: &str) -> Result<Vec<Annotation>, CacheError>;
}

/// HTTP client for the remote cache.
pub struct CacheApi {
    client: reqwest::Client,
    base_url: String,
}

impl CacheApi {
    /// Create a client for `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn document_url(&self, media_id: &str) -> String {
        format!("{}/{}.json", self.base_url, media_id)
    }
}

#[async_trait]
impl AnnotationCache for CacheApi {
    async fn fetch(&self, media_id: &str) -> Result<Vec<Annotation>, CacheError> {
        let url = self.document_url(media_id);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CacheError::NotFound);
        }
        if status != reqwest::StatusCode::OK {
            return Err(CacheError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let document = parse_cache_document(&body)?;
        if let Some(generated_at) = document.generated_at() {
            tracing::debug!(media_id, %generated_at, "Cached annotation set found");
        }
        let annotations = document.into_annotations().map_err(WireError::from)?;
        Ok(annotations)
    }
}
