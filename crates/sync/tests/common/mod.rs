//! Shared harness for controller integration tests.
//!
//! Runs a [`SyncController`] on the test's (paused-clock) runtime with
//! scripted upstreams and a presenter that records every instruction.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use popup_core::annotation::Annotation;
use popup_facts::cache::{AnnotationCache, CacheError};
use popup_facts::generator::{AnnotationGenerator, GeneratorError};
use popup_facts::resolver::AnnotationResolver;
use popup_facts::wire::{parse_generate_response, GenerateResponse};
use popup_sync::config::SyncConfig;
use popup_sync::controller::SyncController;
use popup_sync::host::{HostEvent, SharedPage};
use popup_sync::presenter::OverlayPresenter;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const GENERATOR_URL: &str = "http://localhost:5000/generate-facts";

/// Comfortably past the 500 ms settle delay.
pub const SETTLE: Duration = Duration::from_millis(600);

pub fn watch_url(media_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={media_id}")
}

// ---------------------------------------------------------------------------
// Recording presenter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cue {
    Show(String),
    Hide,
    Intro,
    Notice(String),
}

#[derive(Debug, Clone, Default)]
pub struct SharedRecorder {
    cues: Arc<Mutex<Vec<Cue>>>,
}

impl SharedRecorder {
    pub fn cues(&self) -> Vec<Cue> {
        self.cues.lock().unwrap().clone()
    }

    pub fn shown(&self) -> Vec<String> {
        self.cues()
            .into_iter()
            .filter_map(|c| match c {
                Cue::Show(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<String> {
        self.cues()
            .into_iter()
            .filter_map(|c| match c {
                Cue::Notice(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, cue: &Cue) -> usize {
        self.cues().iter().filter(|c| *c == cue).count()
    }

    fn push(&self, cue: Cue) {
        self.cues.lock().unwrap().push(cue);
    }
}

impl OverlayPresenter for SharedRecorder {
    fn show_annotation(&mut self, text: &str) {
        self.push(Cue::Show(text.to_string()));
    }

    fn hide_annotation(&mut self) {
        self.push(Cue::Hide);
    }

    fn show_intro_marker(&mut self) {
        self.push(Cue::Intro);
    }

    fn show_error_notice(&mut self, message: &str) {
        self.push(Cue::Notice(message.to_string()));
    }
}

// ---------------------------------------------------------------------------
// Scripted upstreams
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ScriptedCache {
    entries: HashMap<String, Vec<Annotation>>,
    pub lookups: Mutex<Vec<String>>,
}

impl ScriptedCache {
    pub fn with(mut self, media_id: &str, annotations: Vec<Annotation>) -> Self {
        self.entries.insert(media_id.to_string(), annotations);
        self
    }
}

#[async_trait]
impl AnnotationCache for ScriptedCache {
    async fn fetch(&self, media_id: &str) -> Result<Vec<Annotation>, CacheError> {
        self.lookups.lock().unwrap().push(media_id.to_string());
        self.entries
            .get(media_id)
            .cloned()
            .ok_or(CacheError::NotFound)
    }
}

#[derive(Clone)]
pub enum Reply {
    /// A 200 body from the generation endpoint.
    Body(&'static str),
    /// A non-200 status.
    Status(u16),
    /// The endpoint could not be reached.
    Unreachable,
}

#[derive(Default)]
pub struct ScriptedGenerator {
    replies: HashMap<String, (Duration, Reply)>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedGenerator {
    pub fn reply(self, media_id: &str, reply: Reply) -> Self {
        self.reply_after(media_id, Duration::ZERO, reply)
    }

    pub fn reply_after(mut self, media_id: &str, delay: Duration, reply: Reply) -> Self {
        self.replies.insert(media_id.to_string(), (delay, reply));
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnnotationGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        media_id: &str,
        title: &str,
    ) -> Result<GenerateResponse, GeneratorError> {
        self.calls
            .lock()
            .unwrap()
            .push((media_id.to_string(), title.to_string()));

        let (delay, reply) = self
            .replies
            .get(media_id)
            .cloned()
            .unwrap_or((Duration::ZERO, Reply::Status(404)));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Reply::Body(body) => Ok(parse_generate_response(body)?),
            Reply::Status(status) => Err(GeneratorError::Status {
                status,
                body: String::new(),
            }),
            Reply::Unreachable => {
                let err = reqwest::Client::new().get("://bad").build().unwrap_err();
                Err(GeneratorError::Request(err))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub page: SharedPage,
    pub presenter: SharedRecorder,
    pub cache: Arc<ScriptedCache>,
    pub generator: Arc<ScriptedGenerator>,
    events: mpsc::Sender<HostEvent>,
    handle: JoinHandle<SyncController<SharedPage, SharedRecorder>>,
}

impl Harness {
    pub fn start(cache: ScriptedCache, generator: ScriptedGenerator) -> Self {
        Self::start_on(SharedPage::new(), cache, generator)
    }

    /// Start with a page that may already show a watch URL.
    pub fn start_on(page: SharedPage, cache: ScriptedCache, generator: ScriptedGenerator) -> Self {
        let presenter = SharedRecorder::default();
        let cache = Arc::new(cache);
        let generator = Arc::new(generator);
        let resolver = AnnotationResolver::new(cache.clone(), generator.clone());

        let mut config = SyncConfig::new("http://cache.test/facts");
        config.generator_url = GENERATOR_URL.to_string();

        let controller = SyncController::new(page.clone(), presenter.clone(), resolver, config);
        let (events, rx) = mpsc::channel(64);
        let handle = tokio::spawn(controller.run(rx));

        Self {
            page,
            presenter,
            cache,
            generator,
            events,
            handle,
        }
    }

    /// Simulate an in-app navigation and wait out the settle delay.
    pub async fn navigate(&self, media_id: &str, title: &str) {
        self.navigate_to(&watch_url(media_id), title).await;
    }

    pub async fn navigate_to(&self, url: &str, title: &str) {
        self.page.navigate(url, Some(title.to_string()));
        self.send(HostEvent::NavigationFinished).await;
        tokio::time::sleep(SETTLE).await;
    }

    pub async fn tick(&self, position_secs: f64) {
        self.send(HostEvent::TimeUpdate { position_secs }).await;
    }

    pub async fn send(&self, event: HostEvent) {
        self.events.send(event).await.expect("controller is running");
        flush().await;
    }

    /// Close the host event stream and return the controller's final state.
    pub async fn finish(self) -> SyncController<SharedPage, SharedRecorder> {
        drop(self.events);
        self.handle.await.expect("controller task")
    }
}

/// Let the controller drain everything that is ready.
pub async fn flush() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

/// Advance the paused clock.
pub async fn advance(by: Duration) {
    tokio::time::sleep(by).await;
}
