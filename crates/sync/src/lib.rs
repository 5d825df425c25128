//! `popup-sync` library crate.
//!
//! The annotation-sync controller: media identity tracking, the playback
//! sync loop, and the presenter seam. The `popup-bridge` binary in
//! `main.rs` binds it to a line-oriented host on stdin.

pub mod config;
pub mod context;
pub mod controller;
pub mod host;
pub mod playback;
pub mod presenter;
pub mod tracker;
