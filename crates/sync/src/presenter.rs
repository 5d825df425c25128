//! Overlay presentation sink.
//!
//! The presenter owns the single visible overlay element. Every call is
//! fire-and-forget; timing beyond the dwell enforced by the sync loop is
//! the presenter's own business.

use popup_core::annotation::ResolveFailure;

pub trait OverlayPresenter {
    fn show_annotation(&mut self, text: &str);
    fn hide_annotation(&mut self);
    fn show_intro_marker(&mut self);
    fn show_error_notice(&mut self, message: &str);
}

/// Renders overlay instructions as log lines. Used by the headless bridge.
#[derive(Debug, Default)]
pub struct TracingPresenter;

impl OverlayPresenter for TracingPresenter {
    fn show_annotation(&mut self, text: &str) {
        tracing::info!(text, "Pop-up shown");
    }

    fn hide_annotation(&mut self) {
        tracing::info!("Pop-up hidden");
    }

    fn show_intro_marker(&mut self) {
        tracing::info!("Intro marker shown");
    }

    fn show_error_notice(&mut self, message: &str) {
        tracing::warn!(notice = message, "Error notice shown");
    }
}

/// Text of the notice shown when resolution fails.
pub fn notice_message(failure: &ResolveFailure, generator_url: &str) -> String {
    match failure {
        ResolveFailure::Unreachable(_) => format!(
            "Fact generator is not running. Start the backend server at {generator_url}."
        ),
        other => format!("Fact generation failed: {other}"),
    }
}
