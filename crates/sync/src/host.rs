//! Host page binding: the events a page emits and the navigation state
//! the tracker reads back.

use std::sync::{Arc, Mutex};

/// A notification from the host page.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// The page finished an in-app navigation.
    NavigationFinished,
    /// A media element now exists on the page.
    MediaElementFound,
    /// Playback position changed (native media-update granularity).
    TimeUpdate { position_secs: f64 },
    Pause,
    SeekStart,
    SeekEnd,
}

impl HostEvent {
    /// Events that must immediately suppress any displayed annotation.
    pub fn suppresses(&self) -> bool {
        matches!(self, Self::Pause | Self::SeekStart | Self::SeekEnd)
    }
}

/// Read access to the page's navigation state at call time.
pub trait HostPage {
    fn current_url(&self) -> Option<String>;
    fn document_title(&self) -> Option<String>;
}

#[derive(Debug, Default)]
struct PageSnapshot {
    url: Option<String>,
    title: Option<String>,
}

/// Page state written by whatever observes the real page and read by the
/// controller. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct SharedPage {
    inner: Arc<Mutex<PageSnapshot>>,
}

impl SharedPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the page's URL and title after a navigation.
    pub fn navigate(&self, url: impl Into<String>, title: Option<String>) {
        let mut page = self.lock();
        page.url = Some(url.into());
        page.title = title;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PageSnapshot> {
        // A panic while holding this lock cannot leave the snapshot torn.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HostPage for SharedPage {
    fn current_url(&self) -> Option<String> {
        self.lock().url.clone()
    }

    fn document_title(&self) -> Option<String> {
        self.lock().title.clone()
    }
}
