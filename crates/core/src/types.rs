/// Opaque identifier of a playable item (the `v` parameter of a watch URL).
pub type MediaId = String;

/// Text sent to the generator when no display title could be extracted.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Best-effort display title of the current item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Title {
    Known(String),
    Unknown,
}

impl Title {
    /// Wrap an optional raw title, mapping blank input to [`Title::Unknown`].
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(t) if !t.is_empty() => Self::Known(t.to_string()),
            _ => Self::Unknown,
        }
    }

    /// The text used as the generator's `title` hint.
    pub fn as_hint(&self) -> &str {
        match self {
            Self::Known(t) => t,
            Self::Unknown => UNKNOWN_TITLE,
        }
    }
}
