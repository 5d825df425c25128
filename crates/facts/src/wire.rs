//! JSON wire types for the cache documents and the generation endpoint.
//!
//! Cached fact files and the `data` field of a generation response share
//! one shape: a `facts` array of `{"time", "text"}` entries plus metadata
//! we mostly ignore. Older cache documents spell these
//! `annotations` / `atSecond`; both spellings are accepted.

use chrono::{DateTime, Utc};
use popup_core::annotation::Annotation;
use popup_core::error::CoreError;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Facts document
// ---------------------------------------------------------------------------

/// One timed fact as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct WireFact {
    /// Seconds into playback; any JSON number.
    #[serde(alias = "atSecond")]
    pub time: f64,
    pub text: String,
}

/// A stored set of facts for one media item.
#[derive(Debug, Clone, Deserialize)]
pub struct FactsDocument {
    #[serde(alias = "annotations")]
    pub facts: Vec<WireFact>,
    #[serde(default, rename = "videoId")]
    pub video_id: Option<String>,
    /// Raw timestamp; kept as text so a bad value never rejects the set.
    #[serde(default, rename = "generatedAt")]
    pub generated_at: Option<String>,
}

impl FactsDocument {
    /// When the set was generated, if the document says so.
    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        self.generated_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Convert to domain annotations, preserving source order.
    ///
    /// A single invalid entry rejects the whole document.
    pub fn into_annotations(self) -> Result<Vec<Annotation>, CoreError> {
        self.facts
            .into_iter()
            .map(|fact| Annotation::from_wire(fact.time, fact.text))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Generation endpoint
// ---------------------------------------------------------------------------

/// Body of `POST <generator_url>`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest<'a> {
    pub video_id: &'a str,
    pub title: &'a str,
}

/// A 200 response from the generation endpoint, tagged by `"source"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum GenerateResponse {
    /// The item was judged not eligible for annotation.
    Skipped {
        reason: String,
        #[serde(default)]
        detail: Option<String>,
    },
    /// Freshly generated, or served from the generator's own store.
    #[serde(alias = "cache")]
    Generated { data: FactsDocument },
}

/// Errors reading a wire document.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] CoreError),
}

/// Parse a cache document body into annotations.
pub fn parse_cache_document(body: &str) -> Result<FactsDocument, WireError> {
    Ok(serde_json::from_str(body)?)
}

/// Parse a 200 body from the generation endpoint.
pub fn parse_generate_response(body: &str) -> Result<GenerateResponse, WireError> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parse_published_fact_file() {
        let json = r#"{
            "videoId": "abc123",
            "title": "Song",
            "artist": "Artist",
            "song": "Song",
            "generatedAt": "2025-03-01T12:00:00.123456Z",
            "facts": [{"time": 10, "text": "X"}, {"time": 25.5, "text": "Y"}]
        }"#;
        let doc = parse_cache_document(json).unwrap();
        assert_eq!(doc.video_id.as_deref(), Some("abc123"));
        assert!(doc.generated_at().is_some());

        let annotations = doc.into_annotations().unwrap();
        assert_eq!(
            annotations,
            vec![Annotation::new(10, "X"), Annotation::new(25, "Y")]
        );
    }

    #[test]
    fn parse_annotation_spelling() {
        let json = r#"{"annotations": [{"atSecond": 3, "text": "hi"}], "extra": true}"#;
        let annotations = parse_cache_document(json)
            .unwrap()
            .into_annotations()
            .unwrap();
        assert_eq!(annotations, vec![Annotation::new(3, "hi")]);
    }

    #[test]
    fn bad_generated_at_does_not_reject_document() {
        let json = r#"{"facts": [], "generatedAt": "yesterday"}"#;
        let doc = parse_cache_document(json).unwrap();
        assert!(doc.generated_at().is_none());
    }

    #[test]
    fn negative_time_rejects_document() {
        let json = r#"{"facts": [{"time": -4, "text": "bad"}]}"#;
        let doc = parse_cache_document(json).unwrap();
        assert!(doc.into_annotations().is_err());
    }

    #[test]
    fn missing_facts_is_malformed() {
        assert_matches!(parse_cache_document(r#"{"title": "x"}"#), Err(WireError::Json(_)));
        assert_matches!(parse_cache_document("<html>"), Err(WireError::Json(_)));
    }

    #[test]
    fn parse_skipped_response() {
        let json = r#"{"source":"skipped","reason":"Not detected as a music video","detail":"Contains non-music keyword","data":null}"#;
        let response = parse_generate_response(json).unwrap();
        assert_matches!(
            response,
            GenerateResponse::Skipped { reason, detail: Some(_) } if reason == "Not detected as a music video"
        );
    }

    #[test]
    fn parse_generated_and_cache_sources() {
        for source in ["generated", "cache"] {
            let json = format!(
                r#"{{"source":"{source}","data":{{"facts":[{{"time":10,"text":"X"}},{{"time":10,"text":"Y"}}]}}}}"#
            );
            let response = parse_generate_response(&json).unwrap();
            let GenerateResponse::Generated { data } = response else {
                panic!("Expected Generated for source {source}");
            };
            assert_eq!(data.facts.len(), 2);
        }
    }

    #[test]
    fn unknown_source_is_malformed() {
        let json = r#"{"source":"mystery","data":{}}"#;
        assert_matches!(parse_generate_response(json), Err(WireError::Json(_)));
    }

    #[test]
    fn generate_request_uses_snake_case_keys() {
        let body = serde_json::to_value(GenerateRequest {
            video_id: "abc123",
            title: "Artist - Song",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"video_id": "abc123", "title": "Artist - Song"}));
    }
}
