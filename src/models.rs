//! Data models for aggregated items and dashboard editions.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Item`]: One normalized piece of aggregated content from any source
//! - [`Dashboard`]: Per-scenario item collections for a single daily edition
//! - [`FetchError`]: Failure surface of a single source adapter call
//!
//! Items are created fresh per run by a source adapter, flow through the
//! transform stages (enrich, translate, tag, rank) which only add fields or
//! rewrite `title`, and are discarded after rendering. Nothing outlives one
//! invocation of the orchestrator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One normalized piece of aggregated content.
///
/// `heat` and `time` stay in source-native free-text form ("120 points",
/// "3.5万", "Real-time"); adapters never normalize units. The comparable
/// numeric rank key lives in `heat_score` and is attached last, by the ranker.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Item {
    /// Display name of the origin adapter (e.g., "Hacker News").
    pub source: String,
    /// Human-readable headline; rewritten in place by translator and tagger.
    pub title: String,
    /// Canonical link; may be empty for sources lacking one.
    #[serde(default)]
    pub url: String,
    /// Source-native popularity signal, free text.
    #[serde(default)]
    pub heat: String,
    /// Source-native recency signal, free text; advisory only, never parsed.
    #[serde(default)]
    pub time: String,
    /// Short derived description, at most ~150 characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Enriched page text, at most 3000 characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Normalized rank key; absent until the ranker runs, then non-negative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heat_score: Option<f64>,
    /// Post author handle (social-post sources only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Curated account category (social-post sources only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Attached image URL (social-post sources only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Item {
    /// Build a bare item with the fields every adapter extracts.
    /// Extension and derived fields start unset.
    pub fn new(
        source: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        heat: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            title: title.into(),
            url: url.into(),
            heat: heat.into(),
            time: time.into(),
            summary: None,
            content: None,
            heat_score: None,
            author: None,
            category: None,
            image: None,
        }
    }
}

/// All scenario results for one daily edition, as handed to the renderer
/// and the JSON API writer. Sections keep the orchestrator's fetch order.
#[derive(Debug, Deserialize, Serialize)]
pub struct Dashboard {
    /// The date stamp in `YYYY-MM-DD` form (Beijing time).
    pub local_date: String,
    /// Optional daily summary blurb shown above the sections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Scenario key plus its ranked items, in fetch order.
    pub sections: Vec<Section>,
}

impl Dashboard {
    /// Total item count across all sections.
    pub fn total_items(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }
}

/// One scenario's worth of ranked, truncated items.
#[derive(Debug, Deserialize, Serialize)]
pub struct Section {
    pub key: String,
    pub items: Vec<Item>,
}

/// Failure of a single adapter call. The fan-out coordinator interprets any
/// variant as "this adapter contributes nothing"; nothing propagates further.
#[derive(Debug)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, TLS, body read).
    Http(reqwest::Error),
    /// The response did not have the expected shape (selectors matched
    /// nothing, JSON keys missing, feed unparseable).
    Parse(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Http(e) => write!(f, "http error: {e}"),
            FetchError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Http(e) => Some(e),
            FetchError::Parse(_) => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Http(e)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_new_leaves_derived_fields_unset() {
        let item = Item::new(
            "Hacker News",
            "A title",
            "https://example.com",
            "12 points",
            "1 hour ago",
        );
        assert_eq!(item.source, "Hacker News");
        assert!(item.summary.is_none());
        assert!(item.content.is_none());
        assert!(item.heat_score.is_none());
        assert!(item.author.is_none());
    }

    #[test]
    fn test_item_serialization_skips_unset_options() {
        let item = Item::new("V2EX", "Topic", "https://v2ex.com/t/1", "50 replies", "Hot");
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("50 replies"));
        assert!(!json.contains("heat_score"));
        assert!(!json.contains("summary"));
    }

    #[test]
    fn test_item_deserialization_defaults() {
        let json = r#"{"source": "36Kr", "title": "快讯"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.title, "快讯");
        assert_eq!(item.url, "");
        assert_eq!(item.heat, "");
        assert!(item.heat_score.is_none());
    }

    #[test]
    fn test_dashboard_serialization() {
        let dashboard = Dashboard {
            local_date: "2026-01-22".to_string(),
            summary: Some("3 items".to_string()),
            sections: vec![Section {
                key: "ai".to_string(),
                items: vec![],
            }],
        };
        let json = serde_json::to_string(&dashboard).unwrap();
        assert!(json.contains("2026-01-22"));
        assert!(json.contains("\"ai\""));
        assert_eq!(dashboard.total_items(), 0);
    }

    #[test]
    fn test_fetch_error_display() {
        let e = FetchError::Parse("no .athing rows".to_string());
        assert_eq!(e.to_string(), "parse error: no .athing rows");
    }
}
