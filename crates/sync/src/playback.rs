//! Playback-position synchronized display and eviction of annotations.
//!
//! [`PlaybackSync`] owns the single "currently displayed" slot. Every
//! display gets a fresh [`DisplayToken`]; the dwell timer carries that
//! token back so a late timer can never hide a newer annotation.

use popup_core::annotation::first_due;
use popup_core::session::MediaSession;
use popup_core::timing::{playback_second, INTRO_WINDOW_SECS};

use crate::presenter::OverlayPresenter;

/// Phase of the sync loop, derived from the attached session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// No session attached.
    Idle,
    /// Session attached, resolution still in flight.
    WaitingForResolution,
    /// Resolved; position updates are matched.
    Active,
}

impl SyncPhase {
    pub fn of(session: Option<&MediaSession>) -> Self {
        match session {
            None => Self::Idle,
            Some(s) if !s.resolved => Self::WaitingForResolution,
            Some(_) => Self::Active,
        }
    }
}

/// Identifies one display of an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayToken(u64);

#[derive(Debug)]
struct Displayed {
    token: DisplayToken,
    text: String,
}

#[derive(Debug, Default)]
pub struct PlaybackSync {
    displayed: Option<Displayed>,
    next_token: u64,
}

impl PlaybackSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the annotation currently on screen, if any.
    pub fn displayed(&self) -> Option<&str> {
        self.displayed.as_ref().map(|d| d.text.as_str())
    }

    /// Handle a position update for an attached session.
    ///
    /// Returns the token of a newly displayed annotation; the caller must
    /// arm a dwell timer for it.
    pub fn on_position(
        &mut self,
        session: &mut MediaSession,
        position_secs: f64,
        presenter: &mut impl OverlayPresenter,
    ) -> Option<DisplayToken> {
        if !session.resolved {
            return None;
        }
        let t = playback_second(position_secs)?;

        if t <= INTRO_WINDOW_SECS && session.take_intro() {
            presenter.show_intro_marker();
        }

        if self.displayed.is_some() {
            return None;
        }
        let annotation = first_due(&session.annotations, t)?;

        let token = DisplayToken(self.next_token);
        self.next_token += 1;
        tracing::debug!(
            media_id = %session.media_id,
            second = t,
            token = token.0,
            "Annotation due",
        );
        presenter.show_annotation(&annotation.text);
        self.displayed = Some(Displayed {
            token,
            text: annotation.text.clone(),
        });
        Some(token)
    }

    /// Hide whatever is displayed. Safe to call when nothing is.
    pub fn suppress(&mut self, presenter: &mut impl OverlayPresenter) {
        if self.displayed.take().is_some() {
            presenter.hide_annotation();
        }
    }

    /// Dwell timer fired for `token`. Hides only if that display is
    /// still current; returns whether it did.
    pub fn on_dwell_elapsed(
        &mut self,
        token: DisplayToken,
        presenter: &mut impl OverlayPresenter,
    ) -> bool {
        if self.displayed.as_ref().map(|d| d.token) != Some(token) {
            return false;
        }
        self.suppress(presenter);
        true
    }
}
