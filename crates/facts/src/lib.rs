//! Annotation sources: the shared remote cache and the companion
//! generation endpoint.
//!
//! Provides typed wire parsing, [`reqwest`]-backed HTTP clients for both
//! upstreams, and the two-tier [`resolver::AnnotationResolver`] that
//! tries the cache first and falls back to generation.

pub mod cache;
pub mod generator;
pub mod resolver;
pub mod wire;
