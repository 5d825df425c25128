//! Timed annotations and the outcome of resolving a set of them.
//!
//! An [`Annotation`] is a single fact pinned to a playback second. The
//! resolver produces an [`AnnotationSet`] per media item, which the sync
//! loop flattens into the session's ordered annotation sequence.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Annotation
// ---------------------------------------------------------------------------

/// A fact that becomes due at `at_second` of playback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub at_second: u32,
    pub text: String,
}

impl Annotation {
    pub fn new(at_second: u32, text: impl Into<String>) -> Self {
        Self {
            at_second,
            text: text.into(),
        }
    }

    /// Build an annotation from a JSON-number timestamp.
    ///
    /// Fractional times are floored to the second they fall in. Negative,
    /// non-finite, or out-of-range times are rejected.
    pub fn from_wire(time: f64, text: String) -> Result<Self, CoreError> {
        if !time.is_finite() || time < 0.0 {
            return Err(CoreError::Validation(format!(
                "annotation time must be a non-negative number, got {time}"
            )));
        }
        let floored = time.floor();
        if floored > f64::from(u32::MAX) {
            return Err(CoreError::Validation(format!(
                "annotation time {time} is out of range"
            )));
        }
        Ok(Self::new(floored as u32, text))
    }
}

/// Return the first annotation (in source order) due at `second`.
///
/// Several annotations may share a second; only the first is ever matched.
pub fn first_due(annotations: &[Annotation], second: u32) -> Option<&Annotation> {
    annotations.iter().find(|a| a.at_second == second)
}

// ---------------------------------------------------------------------------
// Resolution outcome
// ---------------------------------------------------------------------------

/// Why an annotation set could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveFailure {
    /// The generation endpoint could not be reached at all.
    #[error("generator unreachable: {0}")]
    Unreachable(String),

    /// The generation endpoint answered with a non-success status.
    #[error("generator returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The generation endpoint answered 200 with a body we could not read.
    #[error("generator returned a malformed payload: {0}")]
    Malformed(String),
}

impl ResolveFailure {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }
}

/// Result of resolving annotations for one media item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationSet {
    /// Served by the shared remote cache.
    FromCache(Vec<Annotation>),
    /// Produced (or served from its own store) by the generation endpoint.
    Generated(Vec<Annotation>),
    /// The generator declined the item; resolves to no annotations.
    Skipped(String),
    /// Resolution did not complete; resolves to no annotations plus a notice.
    Failed(ResolveFailure),
}

impl AnnotationSet {
    /// Consume the set, yielding the annotation sequence for the session.
    pub fn into_annotations(self) -> Vec<Annotation> {
        match self {
            Self::FromCache(a) | Self::Generated(a) => a,
            Self::Skipped(_) | Self::Failed(_) => Vec::new(),
        }
    }

    /// Short label for logging.
    pub fn source(&self) -> &'static str {
        match self {
            Self::FromCache(_) => "cache",
            Self::Generated(_) => "generated",
            Self::Skipped(_) => "skipped",
            Self::Failed(_) => "failed",
        }
    }

    pub fn failure(&self) -> Option<&ResolveFailure> {
        match self {
            Self::Failed(f) => Some(f),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
