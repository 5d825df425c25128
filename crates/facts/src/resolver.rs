//! Two-tier annotation resolution: shared cache first, generation second.
//!
//! [`AnnotationResolver::resolve`] never fails; every error path folds
//! into an [`AnnotationSet`] variant. Results are not memoised here, so a
//! revisit of the same item resolves again from scratch.

use std::sync::Arc;

use popup_core::annotation::{AnnotationSet, ResolveFailure};
use popup_core::types::Title;

use crate::cache::{AnnotationCache, CacheError};
use crate::generator::{AnnotationGenerator, GeneratorError};
use crate::wire::{GenerateResponse, WireError};

/// Resolves annotation sets for media items.
///
/// Cheap to clone; both upstreams are shared behind `Arc`s so a resolution
/// can be moved into a spawned task.
#[derive(Clone)]
pub struct AnnotationResolver {
    cache: Arc<dyn AnnotationCache>,
    generator: Arc<dyn AnnotationGenerator>,
}

impl AnnotationResolver {
    pub fn new(cache: Arc<dyn AnnotationCache>, generator: Arc<dyn AnnotationGenerator>) -> Self {
        Self { cache, generator }
    }

    /// Resolve annotations for `media_id`, short-circuiting on the first
    /// tier that yields a definite answer.
    pub async fn resolve(&self, media_id: &str, title: &Title) -> AnnotationSet {
        match self.cache.fetch(media_id).await {
            Ok(annotations) => {
                tracing::info!(media_id, count = annotations.len(), "Annotations served from cache");
                return AnnotationSet::FromCache(annotations);
            }
            Err(CacheError::NotFound) => {
                tracing::debug!(media_id, "Cache miss");
            }
            Err(e) => {
                tracing::warn!(media_id, error = %e, "Cache lookup failed, treating as miss");
            }
        }

        tracing::info!(media_id, title = title.as_hint(), "Requesting annotation generation");
        self.generate(media_id, title).await
    }

    async fn generate(&self, media_id: &str, title: &Title) -> AnnotationSet {
        let response = match self.generator.generate(media_id, title.as_hint()).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(media_id, error = %e, "Annotation generation failed");
                return AnnotationSet::Failed(failure_from(e));
            }
        };

        match response {
            GenerateResponse::Skipped { reason, detail } => {
                tracing::info!(media_id, reason = %reason, detail = ?detail, "Generator skipped item");
                AnnotationSet::Skipped(reason)
            }
            GenerateResponse::Generated { data } => match data.into_annotations() {
                Ok(annotations) => {
                    tracing::info!(media_id, count = annotations.len(), "Annotations generated");
                    AnnotationSet::Generated(annotations)
                }
                Err(e) => {
                    tracing::warn!(media_id, error = %e, "Generated annotations are invalid");
                    AnnotationSet::Failed(ResolveFailure::Malformed(e.to_string()))
                }
            },
        }
    }
}

/// Classify a generator error for presentation.
fn failure_from(err: GeneratorError) -> ResolveFailure {
    match err {
        GeneratorError::Request(e) => ResolveFailure::Unreachable(e.to_string()),
        GeneratorError::InvalidUrl(msg) => ResolveFailure::Unreachable(msg),
        GeneratorError::Status { status, body } => ResolveFailure::Upstream { status, body },
        GeneratorError::Parse(WireError::Json(e)) => ResolveFailure::Malformed(e.to_string()),
        GeneratorError::Parse(WireError::Invalid(e)) => ResolveFailure::Malformed(e.to_string()),
    }
}
