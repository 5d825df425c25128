//! The annotation-sync controller.
//!
//! [`SyncController::run`] is the only place session state is mutated.
//! It multiplexes host events with completions of its own suspended work
//! (settle delays, resolutions, dwell timers) via `tokio::select!`. That
//! work runs in spawned tasks which report back over an internal channel
//! and never touch the session directly.

use popup_core::annotation::AnnotationSet;
use popup_core::identity::title_from_document;
use popup_facts::resolver::AnnotationResolver;
use tokio::sync::mpsc;

use crate::config::SyncConfig;
use crate::context::{ResolutionOutcome, SessionContext, SessionTicket};
use crate::host::{HostEvent, HostPage};
use crate::playback::DisplayToken;
use crate::presenter::{notice_message, OverlayPresenter};
use crate::tracker::{current_media_id, MediaTracker, Transition};

/// Completion of work the controller started earlier.
#[derive(Debug)]
enum Completion {
    /// The settle delay after a navigation has elapsed.
    Settled,
    Resolved {
        ticket: SessionTicket,
        set: AnnotationSet,
    },
    DwellElapsed(DisplayToken),
}

pub struct SyncController<H, P> {
    host: H,
    presenter: P,
    resolver: AnnotationResolver,
    config: SyncConfig,
    tracker: MediaTracker,
    context: SessionContext,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl<H, P> SyncController<H, P>
where
    H: HostPage,
    P: OverlayPresenter,
{
    pub fn new(host: H, presenter: P, resolver: AnnotationResolver, config: SyncConfig) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            host,
            presenter,
            resolver,
            config,
            tracker: MediaTracker::new(),
            context: SessionContext::new(),
            completions_tx,
            completions_rx,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Drive the controller until the host event stream closes.
    ///
    /// Identity is read once up front to cover a direct load of a watch
    /// page. Returns the controller so its final state can be inspected.
    pub async fn run(mut self, mut events: mpsc::Receiver<HostEvent>) -> Self {
        tracing::info!("Annotation sync controller started");
        self.check_identity();

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle_host_event(event),
                    None => break,
                },
                Some(done) = self.completions_rx.recv() => self.handle_completion(done),
            }
        }

        tracing::info!("Host event stream closed, controller stopping");
        self
    }

    fn handle_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::NavigationFinished => self.schedule_settle(),
            HostEvent::MediaElementFound => {
                tracing::debug!("Media element attached");
                if self.tracker.active().is_none() {
                    self.check_identity();
                }
            }
            HostEvent::TimeUpdate { position_secs } => {
                if let Some(token) = self.context.on_position(position_secs, &mut self.presenter) {
                    self.schedule_dwell(token);
                }
            }
            event if event.suppresses() => {
                tracing::trace!(?event, "Suppressing displayed annotation");
                self.context.suppress(&mut self.presenter);
            }
            event => tracing::trace!(?event, "Ignoring host event"),
        }
    }

    fn handle_completion(&mut self, done: Completion) {
        match done {
            Completion::Settled => self.check_identity(),
            Completion::Resolved { ticket, set } => self.apply_resolution(ticket, set),
            Completion::DwellElapsed(token) => {
                self.context.on_dwell_elapsed(token, &mut self.presenter);
            }
        }
    }

    fn check_identity(&mut self) {
        let current = current_media_id(&self.host);
        if let Some(transition) = self.tracker.observe(current) {
            self.start_session(transition);
        }
    }

    /// Reset per-item state and kick off resolution for the new item.
    fn start_session(&mut self, transition: Transition) {
        let title = title_from_document(self.host.document_title().as_deref());
        tracing::info!(
            old = ?transition.old,
            new = %transition.new,
            title = title.as_hint(),
            "Media transition",
        );

        let ticket = self
            .context
            .begin(transition.new, title.clone(), &mut self.presenter);

        let resolver = self.resolver.clone();
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let set = resolver.resolve(&ticket.media_id, &title).await;
            // The controller may already be gone; nothing to report to.
            let _ = tx.send(Completion::Resolved { ticket, set });
        });
    }

    fn apply_resolution(&mut self, ticket: SessionTicket, set: AnnotationSet) {
        match self.context.apply_resolution(&ticket, set) {
            ResolutionOutcome::Stale => {
                tracing::debug!(media_id = %ticket.media_id, "Discarding stale resolution");
            }
            ResolutionOutcome::Applied { failure: Some(failure) } => {
                let message = notice_message(&failure, &self.config.generator_url);
                self.presenter.show_error_notice(&message);
            }
            ResolutionOutcome::Applied { failure: None } => {}
        }
    }

    fn schedule_settle(&self) {
        let tx = self.completions_tx.clone();
        let delay = self.config.settle_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Completion::Settled);
        });
    }

    fn schedule_dwell(&self, token: DisplayToken) {
        let tx = self.completions_tx.clone();
        let dwell = self.config.dwell;
        tokio::spawn(async move {
            tokio::time::sleep(dwell).await;
            let _ = tx.send(Completion::DwellElapsed(token));
        });
    }
}
