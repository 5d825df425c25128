use std::time::Duration;

use popup_core::timing::{DWELL, SETTLE_DELAY};

/// Default generation endpoint (the companion backend's local address).
pub const DEFAULT_GENERATOR_URL: &str = "http://localhost:5000/generate-facts";

const DEFAULT_CACHE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_GENERATE_TIMEOUT_SECS: u64 = 120;

/// Static configuration of the sync controller and its upstreams.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the shared cache; documents live at `<base>/<id>.json`.
    pub cache_base_url: String,
    /// Generation endpoint receiving `POST {"video_id", "title"}`.
    pub generator_url: String,
    pub settle_delay: Duration,
    pub dwell: Duration,
    pub cache_timeout: Duration,
    pub generate_timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{var} must be a non-negative integer, got '{value}'")]
    Invalid { var: &'static str, value: String },
}

impl SyncConfig {
    /// Configuration with every default except the cache location.
    pub fn new(cache_base_url: impl Into<String>) -> Self {
        Self {
            cache_base_url: cache_base_url.into(),
            generator_url: DEFAULT_GENERATOR_URL.to_string(),
            settle_delay: SETTLE_DELAY,
            dwell: DWELL,
            cache_timeout: Duration::from_secs(DEFAULT_CACHE_TIMEOUT_SECS),
            generate_timeout: Duration::from_secs(DEFAULT_GENERATE_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var                       | Default                                 |
    /// |-------------------------------|-----------------------------------------|
    /// | `POPUP_CACHE_BASE_URL`        | required                                |
    /// | `POPUP_GENERATOR_URL`         | `http://localhost:5000/generate-facts`  |
    /// | `POPUP_SETTLE_DELAY_MS`       | `500`                                   |
    /// | `POPUP_DWELL_SECS`            | `8`                                     |
    /// | `POPUP_CACHE_TIMEOUT_SECS`    | `10`                                    |
    /// | `POPUP_GENERATE_TIMEOUT_SECS` | `120`                                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let cache_base_url =
            lookup("POPUP_CACHE_BASE_URL").ok_or(ConfigError::Missing("POPUP_CACHE_BASE_URL"))?;
        let mut config = Self::new(cache_base_url);

        if let Some(url) = lookup("POPUP_GENERATOR_URL") {
            config.generator_url = url;
        }
        if let Some(ms) = parse_u64(&lookup, "POPUP_SETTLE_DELAY_MS")? {
            config.settle_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_u64(&lookup, "POPUP_DWELL_SECS")? {
            config.dwell = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_u64(&lookup, "POPUP_CACHE_TIMEOUT_SECS")? {
            config.cache_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_u64(&lookup, "POPUP_GENERATE_TIMEOUT_SECS")? {
            config.generate_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn parse_u64(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<u64>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}
