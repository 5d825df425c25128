//! Domain types shared by the annotation resolver and the sync controller.
//!
//! Nothing in this crate performs I/O; it holds the annotation model,
//! per-item session state, watch-page identity parsing, and the fixed
//! timing constants of the playback loop.

pub mod annotation;
pub mod error;
pub mod identity;
pub mod session;
pub mod timing;
pub mod types;
