//! Media identity tracking.
//!
//! Purely observational: the controller decides when to read identity
//! (after the settle delay, or on first sight of a media element) and
//! feeds the reading to [`MediaTracker::observe`].

use popup_core::identity::media_id_from_url;
use popup_core::types::MediaId;

use crate::host::HostPage;

/// A change of the item being watched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub old: Option<MediaId>,
    pub new: MediaId,
}

/// Read the current media id from the host's navigation state.
pub fn current_media_id(host: &impl HostPage) -> Option<MediaId> {
    host.current_url().as_deref().and_then(media_id_from_url)
}

/// Remembers the active media id and reports genuine changes.
#[derive(Debug, Default)]
pub struct MediaTracker {
    active: Option<MediaId>,
}

impl MediaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Compare a fresh identity reading against the active id.
    ///
    /// Returns `None` when there is no id (non-watch page) or it equals
    /// the active one.
    pub fn observe(&mut self, current: Option<MediaId>) -> Option<Transition> {
        let new = current?;
        if self.active.as_deref() == Some(new.as_str()) {
            return None;
        }
        let old = self.active.replace(new.clone());
        Some(Transition { old, new })
    }
}
