//! `popup-bridge` -- headless host binding for the annotation-sync controller.
//!
//! Reads newline-delimited JSON host events from stdin, keeps the page
//! state the tracker reads, and forwards playback events to the
//! controller. Overlay output is rendered as log lines.
//!
//! ```text
//! {"event":"navigate","url":"https://www.youtube.com/watch?v=abc123","title":"Artist - Song - YouTube"}
//! {"event":"media_element"}
//! {"event":"time_update","position":10.2}
//! {"event":"pause"}
//! ```
//!
//! # Environment variables
//!
//! | Variable                      | Required | Default                                | Description                         |
//! |-------------------------------|----------|----------------------------------------|-------------------------------------|
//! | `POPUP_CACHE_BASE_URL`        | yes      | --                                     | Base URL of cached `<id>.json` sets |
//! | `POPUP_GENERATOR_URL`         | no       | `http://localhost:5000/generate-facts` | Generation endpoint                 |
//! | `POPUP_SETTLE_DELAY_MS`       | no       | `500`                                  | Wait after navigation               |
//! | `POPUP_DWELL_SECS`            | no       | `8`                                    | Pop-up visibility                   |
//! | `POPUP_CACHE_TIMEOUT_SECS`    | no       | `10`                                   | Cache request timeout               |
//! | `POPUP_GENERATE_TIMEOUT_SECS` | no       | `120`                                  | Generation request timeout          |

use std::sync::Arc;
use std::time::Duration;

use popup_facts::cache::CacheApi;
use popup_facts::generator::GeneratorApi;
use popup_facts::resolver::AnnotationResolver;
use popup_sync::config::SyncConfig;
use popup_sync::controller::SyncController;
use popup_sync::host::{HostEvent, SharedPage};
use popup_sync::presenter::TracingPresenter;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Buffered host events between the stdin reader and the controller.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "popup_bridge=info,popup_sync=info,popup_facts=info";

/// Upper bound on the startup health probe.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

/// One line of bridge input.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum BridgeLine {
    Navigate {
        url: String,
        #[serde(default)]
        title: Option<String>,
    },
    MediaElement,
    TimeUpdate {
        position: f64,
    },
    Pause,
    SeekStart,
    SeekEnd,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SyncConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    tracing::info!(
        cache_base_url = %config.cache_base_url,
        generator_url = %config.generator_url,
        "Starting popup-bridge",
    );

    let cache = CacheApi::new(config.cache_base_url.clone(), config.cache_timeout)
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to build cache HTTP client");
            std::process::exit(1);
        });
    let generator = GeneratorApi::new(config.generator_url.clone(), config.generate_timeout)
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to build generator HTTP client");
            std::process::exit(1);
        });

    probe_generator(&generator).await;

    let resolver = AnnotationResolver::new(Arc::new(cache), Arc::new(generator));
    let page = SharedPage::new();
    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    let controller = SyncController::new(page.clone(), TracingPresenter, resolver, config);
    let controller_handle = tokio::spawn(controller.run(rx));

    forward_stdin(&page, tx).await;

    if let Err(e) = controller_handle.await {
        tracing::error!(error = %e, "Controller task failed");
    }
}

/// Log whether the generator is up. Never fails startup.
async fn probe_generator(generator: &GeneratorApi) {
    match tokio::time::timeout(HEALTH_TIMEOUT, generator.health()).await {
        Ok(Ok(health)) => {
            tracing::info!(status = %health.status, service = ?health.service, "Generator reachable");
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Generator health check failed");
        }
        Err(_) => {
            tracing::warn!(
                timeout_secs = HEALTH_TIMEOUT.as_secs(),
                "Generator health check timed out"
            );
        }
    }
}

/// Read bridge lines until stdin closes, translating them to host events.
async fn forward_stdin(page: &SharedPage, tx: mpsc::Sender<HostEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                tracing::info!("stdin closed");
                break;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stdin");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let event = match serde_json::from_str::<BridgeLine>(&line) {
            Ok(BridgeLine::Navigate { url, title }) => {
                page.navigate(url, title);
                HostEvent::NavigationFinished
            }
            Ok(BridgeLine::MediaElement) => HostEvent::MediaElementFound,
            Ok(BridgeLine::TimeUpdate { position }) => HostEvent::TimeUpdate {
                position_secs: position,
            },
            Ok(BridgeLine::Pause) => HostEvent::Pause,
            Ok(BridgeLine::SeekStart) => HostEvent::SeekStart,
            Ok(BridgeLine::SeekEnd) => HostEvent::SeekEnd,
            Err(e) => {
                tracing::warn!(error = %e, raw = %line, "Unknown or malformed bridge line");
                continue;
            }
        };

        if tx.send(event).await.is_err() {
            tracing::warn!("Controller stopped, no longer forwarding events");
            break;
        }
    }
}
