//! Utility functions: date stamping, log-safe truncation, the daily summary
//! blurb, and output-directory validation.

use crate::models::Section;
use chrono::{FixedOffset, Utc};
use itertools::Itertools;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Today's date in `YYYY-MM-DD` form, pinned to Beijing time (UTC+8) so the
/// dashboard date does not depend on where the job runs.
pub fn beijing_today() -> String {
    let beijing = FixedOffset::east_opt(8 * 3600).unwrap();
    Utc::now().with_timezone(&beijing).date_naive().to_string()
}

/// Truncate a string for logging purposes, counting characters so multibyte
/// titles never split a boundary.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 chars)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max).collect();
        format!("{head}…(+{} chars)", count - max)
    }
}

/// Build the daily summary blurb shown above the dashboard sections: total
/// item count, covered scenario keys, and up to three hot titles. Returns
/// `None` when the whole run produced nothing, so the renderer can show its
/// explicit no-data state instead.
pub fn build_summary(sections: &[Section]) -> Option<String> {
    let total: usize = sections.iter().map(|s| s.items.len()).sum();
    if total == 0 {
        return None;
    }

    let categories = sections
        .iter()
        .filter(|s| !s.items.is_empty())
        .map(|s| s.key.to_uppercase())
        .join(", ");
    let mut text =
        format!("今日共追踪到 <strong>{total}</strong> 条前沿资讯，覆盖 {categories} 等领域。");

    let hot_titles = sections
        .iter()
        .flat_map(|s| &s.items)
        .filter(|item| {
            ["points", "stars", "replies", "万"]
                .iter()
                .any(|unit| item.heat.contains(unit))
        })
        .map(|item| item.title.as_str())
        .take(3)
        .collect::<Vec<_>>();
    if !hot_titles.is_empty() {
        text.push_str(&format!("<br>🔥 热门关注：{}...", hot_titles.join("、")));
    }

    Some(text)
}

/// Ensure a directory exists and is writable by creating it and probing a
/// throwaway file. Returns an error early so a bad output path fails the run
/// before any fetching happens.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
