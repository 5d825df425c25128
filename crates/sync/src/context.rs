//! The single owned state of the controller: the active session and the
//! playback display slot.

use popup_core::annotation::{AnnotationSet, ResolveFailure};
use popup_core::session::MediaSession;
use popup_core::types::{MediaId, Title};

use crate::playback::{DisplayToken, PlaybackSync, SyncPhase};
use crate::presenter::OverlayPresenter;

/// Names the session a resolution was started for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTicket {
    pub media_id: MediaId,
    epoch: u64,
}

/// What happened to a settled resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The session it was for has been superseded; nothing changed.
    Stale,
    /// Applied to the active session. Carries the failure to surface, if any.
    Applied { failure: Option<ResolveFailure> },
}

#[derive(Debug, Default)]
pub struct SessionContext {
    session: Option<MediaSession>,
    /// Bumped on every new session, so a revisit of the same id still
    /// counts as a different session.
    epoch: u64,
    playback: PlaybackSync,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&MediaSession> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> SyncPhase {
        SyncPhase::of(self.session.as_ref())
    }

    pub fn displayed(&self) -> Option<&str> {
        self.playback.displayed()
    }

    /// Detach the old session and attach a fresh one for `media_id`.
    pub fn begin(
        &mut self,
        media_id: MediaId,
        title: Title,
        presenter: &mut impl OverlayPresenter,
    ) -> SessionTicket {
        self.playback.suppress(presenter);
        self.epoch += 1;
        self.session = Some(MediaSession::new(media_id.clone(), title));
        SessionTicket {
            media_id,
            epoch: self.epoch,
        }
    }

    /// Apply a settled resolution if `ticket` still names the active session.
    pub fn apply_resolution(&mut self, ticket: &SessionTicket, set: AnnotationSet) -> ResolutionOutcome {
        let Some(session) = self.session.as_mut() else {
            return ResolutionOutcome::Stale;
        };
        if ticket.epoch != self.epoch || ticket.media_id != session.media_id {
            return ResolutionOutcome::Stale;
        }

        let failure = set.failure().cloned();
        tracing::info!(
            media_id = %session.media_id,
            source = set.source(),
            "Annotation set resolved",
        );
        session.apply(set);
        ResolutionOutcome::Applied { failure }
    }

    pub fn on_position(
        &mut self,
        position_secs: f64,
        presenter: &mut impl OverlayPresenter,
    ) -> Option<DisplayToken> {
        let session = self.session.as_mut()?;
        self.playback.on_position(session, position_secs, presenter)
    }

    pub fn suppress(&mut self, presenter: &mut impl OverlayPresenter) {
        self.playback.suppress(presenter);
    }

    pub fn on_dwell_elapsed(&mut self, token: DisplayToken, presenter: &mut impl OverlayPresenter) {
        self.playback.on_dwell_elapsed(token, presenter);
    }
}
