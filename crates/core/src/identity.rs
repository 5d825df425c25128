//! Media identity and title extraction from host navigation state.
//!
//! The host is a single-page video site: the item being watched is named
//! by the `v` query parameter of a `/watch` URL, and the document title
//! carries the display title decorated with a site suffix and, sometimes,
//! an unread-notification counter.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::types::{MediaId, Title};

/// Path of the watch page; other pages carry no media identity.
const WATCH_PATH: &str = "/watch";

/// Query parameter naming the media item.
const MEDIA_ID_PARAM: &str = "v";

/// Media ids are opaque, but each one becomes a path segment of the cache
/// URL (`<base>/<id>.json`). Reject separators, escapes and whitespace.
static PATH_UNSAFE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[/\\?#%\s\p{Cc}]").expect("valid regex"));

/// Leading `(3) ` notification counter in document titles.
static NOTIFICATION_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(\d+\+?\)\s*").expect("valid regex"));

/// Trailing ` - YouTube` site suffix in document titles.
static SITE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*-\s*YouTube\s*$").expect("valid regex"));

/// Extract the media id from a page URL.
///
/// Returns `None` for non-watch pages, unparseable URLs, and missing or
/// malformed ids.
pub fn media_id_from_url(raw_url: &str) -> Option<MediaId> {
    let url = Url::parse(raw_url).ok()?;
    if url.path() != WATCH_PATH {
        return None;
    }
    url.query_pairs()
        .find(|(key, _)| key == MEDIA_ID_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|id| is_path_safe(id))
}

/// Non-empty, not a dot segment, and free of URL path metacharacters.
fn is_path_safe(id: &str) -> bool {
    !id.is_empty() && id != "." && id != ".." && !PATH_UNSAFE_RE.is_match(id)
}

/// Derive the display title from a raw document title.
pub fn title_from_document(raw: Option<&str>) -> Title {
    let Some(raw) = raw else {
        return Title::Unknown;
    };
    let without_prefix = NOTIFICATION_PREFIX_RE.replace(raw.trim(), "");
    let cleaned = SITE_SUFFIX_RE.replace(&without_prefix, "");
    Title::from_raw(Some(&cleaned))
}
