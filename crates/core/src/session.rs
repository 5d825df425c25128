//! Per-item session state.

use crate::annotation::{Annotation, AnnotationSet};
use crate::types::{MediaId, Title};

/// State for one watched media item.
///
/// A session is created when the tracker sees a new media id and is
/// replaced wholesale on the next transition.
#[derive(Debug, Clone)]
pub struct MediaSession {
    pub media_id: MediaId,
    pub title: Title,
    /// Source order; not sorted by time.
    pub annotations: Vec<Annotation>,
    pub resolved: bool,
    pub intro_shown: bool,
}

impl MediaSession {
    pub fn new(media_id: MediaId, title: Title) -> Self {
        Self {
            media_id,
            title,
            annotations: Vec::new(),
            resolved: false,
            intro_shown: false,
        }
    }

    /// Store a resolution outcome. Every outcome marks the session resolved.
    pub fn apply(&mut self, set: AnnotationSet) {
        self.annotations = set.into_annotations();
        self.resolved = true;
    }

    /// Mark the intro marker as shown. Returns `true` only the first time.
    pub fn take_intro(&mut self) -> bool {
        if self.intro_shown {
            return false;
        }
        self.intro_shown = true;
        true
    }
}
