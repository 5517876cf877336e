//! Heat scoring, ranking, and practicality tagging.
//!
//! The heat scorer converts each source's free-text popularity signal
//! ("120 points", "3.5万", "50 replies") into a comparable non-negative number.
//! Ranking is a stable descending sort over that score, so adapters that embed
//! their own priority ordering are not reshuffled among equal scores.
//!
//! Magnitude precedence: a ten-thousand marker ("万" or a Latin "w") counts
//! only when it immediately follows a decimal number, and that branch wins
//! over the unit-word branch: "10w points" scores 100000, not 10.

use crate::models::Item;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use tracing::debug;
use url::Url;

static TEN_THOUSANDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*[w万]").unwrap());
static FIRST_INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Normalize a free-text heat string to a non-negative score.
///
/// Returns 0 for anything unparseable, including the empty string.
pub fn heat_score(heat: &str) -> f64 {
    let s = heat.to_lowercase().replace(',', "");
    if s.is_empty() {
        return 0.0;
    }

    if let Some(caps) = TEN_THOUSANDS.captures(&s) {
        if let Ok(n) = caps[1].parse::<f64>() {
            return n * 10_000.0;
        }
    }

    if s.contains("stars") || s.contains("points") || s.contains("replies") {
        if let Some(m) = FIRST_INT.find(&s) {
            if let Ok(n) = m.as_str().parse::<u64>() {
                return n as f64;
            }
        }
        return 0.0;
    }

    s.parse::<u64>().map(|n| n as f64).unwrap_or(0.0)
}

/// Attach `heat_score` to every item and stable-sort descending by it.
pub fn rank_items(items: &mut Vec<Item>) {
    for item in items.iter_mut() {
        item.heat_score = Some(heat_score(&item.heat));
    }
    items.sort_by(|a, b| {
        let lhs = b.heat_score.unwrap_or(0.0);
        let rhs = a.heat_score.unwrap_or(0.0);
        lhs.partial_cmp(&rhs).unwrap_or(Ordering::Equal)
    });
    debug!(count = items.len(), "Ranked items by heat score");
}

/// Presentation marker for tool-like items (code hosting, product directories).
pub const TOOL_MARK: &str = "🛠️";
/// Presentation marker for tutorial-like items.
pub const TUTORIAL_MARK: &str = "📖";

const TOOL_DOMAINS: [&str; 2] = ["github.com", "producthunt.com"];
const TUTORIAL_PHRASES: [&str; 5] = ["how to", "guide", "tutorial", "101", "course"];

fn is_tool_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    TOOL_DOMAINS
        .iter()
        .any(|d| host == *d || host.ends_with(&format!(".{d}")))
}

/// Prepend tool/tutorial markers to titles based on URL domain and keyword
/// heuristics. Pure and idempotent: a marker already present is never added
/// again, and both checks run in a fixed order (tool, then tutorial) so the
/// output is deterministic.
pub fn tag_practicality(items: &mut [Item]) {
    for item in items.iter_mut() {
        if is_tool_url(&item.url) && !item.title.contains(TOOL_MARK) {
            item.title = format!("{TOOL_MARK} {}", item.title);
        }
        let lower = item.title.to_lowercase();
        if TUTORIAL_PHRASES.iter().any(|p| lower.contains(p))
            && !item.title.contains(TUTORIAL_MARK)
        {
            item.title = format!("{TUTORIAL_MARK} {}", item.title);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, url: &str, heat: &str) -> Item {
        Item::new("Test", title, url, heat, "")
    }

    #[test]
    fn test_heat_score_empty() {
        assert_eq!(heat_score(""), 0.0);
    }

    #[test]
    fn test_heat_score_unit_words() {
        assert_eq!(heat_score("120 points"), 120.0);
        assert_eq!(heat_score("50 replies"), 50.0);
        assert_eq!(heat_score("1,234 stars"), 1234.0);
        assert_eq!(heat_score("replies 5"), 5.0);
    }

    #[test]
    fn test_heat_score_ten_thousands() {
        assert_eq!(heat_score("3.5万"), 35_000.0);
        assert_eq!(heat_score("1万"), 10_000.0);
        assert_eq!(heat_score("2.1w"), 21_000.0);
    }

    #[test]
    fn test_heat_score_magnitude_wins_over_unit_word() {
        // Documented precedence: the magnitude branch is checked first.
        assert_eq!(heat_score("10w points"), 100_000.0);
    }

    #[test]
    fn test_heat_score_bare_marker_is_not_magnitude() {
        // "w" with no adjacent number falls through to the other branches.
        assert_eq!(heat_score("new"), 0.0);
        assert_eq!(heat_score("Top Product"), 0.0);
    }

    #[test]
    fn test_heat_score_plain_integer() {
        assert_eq!(heat_score("4521"), 4521.0);
        assert_eq!(heat_score("1,500,000"), 1_500_000.0);
    }

    #[test]
    fn test_heat_score_garbage() {
        assert_eq!(heat_score("not a number"), 0.0);
        assert_eq!(heat_score("Real-time"), 0.0);
    }

    #[test]
    fn test_heat_score_never_negative() {
        for s in ["", "-5 points", "garbage", "3.5万", "999"] {
            assert!(heat_score(s) >= 0.0, "score({s:?}) was negative");
        }
    }

    #[test]
    fn test_rank_descending() {
        let mut items = vec![
            item("a", "", "10 points"),
            item("b", "", "1万"),
            item("c", "", "500 points"),
        ];
        rank_items(&mut items);
        assert_eq!(items[0].title, "b");
        assert_eq!(items[0].heat_score, Some(10_000.0));
        assert_eq!(items[1].title, "c");
        assert_eq!(items[2].title, "a");
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let mut items = vec![
            item("first", "", ""),
            item("second", "", ""),
            item("third", "", ""),
            item("winner", "", "5 points"),
        ];
        rank_items(&mut items);
        assert_eq!(items[0].title, "winner");
        // Zero-score items keep their prior relative order.
        assert_eq!(items[1].title, "first");
        assert_eq!(items[2].title, "second");
        assert_eq!(items[3].title, "third");
    }

    #[test]
    fn test_tag_tool_by_domain() {
        let mut items = vec![item("repo - desc", "https://github.com/a/b", "")];
        tag_practicality(&mut items);
        assert!(items[0].title.starts_with(TOOL_MARK));
    }

    #[test]
    fn test_tag_tutorial_by_phrase() {
        let mut items = vec![item("How to write Rust", "https://example.com", "")];
        tag_practicality(&mut items);
        assert!(items[0].title.starts_with(TUTORIAL_MARK));
    }

    #[test]
    fn test_tag_both_markers_fixed_order() {
        let mut items = vec![item(
            "A guide to something",
            "https://www.producthunt.com/posts/x",
            "",
        )];
        tag_practicality(&mut items);
        // Tool applied first, tutorial prepended after: tutorial ends up outermost.
        assert!(items[0].title.starts_with(TUTORIAL_MARK));
        assert!(items[0].title.contains(TOOL_MARK));
    }

    #[test]
    fn test_tag_is_idempotent() {
        let mut items = vec![
            item("A guide to Rust", "https://github.com/a/b", ""),
            item("plain title", "https://example.com", ""),
        ];
        tag_practicality(&mut items);
        let once: Vec<String> = items.iter().map(|i| i.title.clone()).collect();
        tag_practicality(&mut items);
        let twice: Vec<String> = items.iter().map(|i| i.title.clone()).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_tag_ignores_unparseable_urls() {
        let mut items = vec![item("title", "", ""), item("title", "notaurl", "")];
        tag_practicality(&mut items);
        assert_eq!(items[0].title, "title");
        assert_eq!(items[1].title, "title");
    }
}
