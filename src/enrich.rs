//! Content enrichment: fetch each item's linked page, strip boilerplate, and
//! derive a bounded summary.
//!
//! Every per-item failure (unreachable URL, timeout, broken markup) simply
//! leaves that item's `content`/`summary` unset; enrichment never fails a run.
//! `ensure_summary` is a separate idempotent pass so that even non-deep runs
//! end up with a summary where one can be derived without fetching.

use crate::models::Item;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use scraper::{Html, Node};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Concurrent page fetches in flight at once.
pub const ENRICH_WORKERS: usize = 10;
const PAGE_TIMEOUT: Duration = Duration::from_secs(5);
const CONTENT_MAX_CHARS: usize = 3000;
const SUMMARY_MAX_CHARS: usize = 150;

const SKIP_TAGS: [&str; 6] = ["script", "style", "nav", "footer", "header", "noscript"];

/// Fetch linked pages for all items with a web URL and attach
/// `content`/`summary`. Items whose fetch or parse fails are left untouched.
#[instrument(level = "info", skip_all, fields(count = items.len()))]
pub async fn enrich_items(client: &Client, items: &mut [Item]) {
    let targets: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.url.starts_with("http"))
        .map(|(i, _)| i)
        .collect();

    let fetched: Vec<(usize, Option<String>)> = stream::iter(targets)
        .map(|idx| {
            let url = items[idx].url.clone();
            let client = client.clone();
            async move { (idx, fetch_page_text(&client, &url).await) }
        })
        .buffer_unordered(ENRICH_WORKERS)
        .collect()
        .await;

    let mut enriched = 0usize;
    for (idx, content) in fetched {
        if let Some(content) = content {
            if !content.is_empty() {
                items[idx].summary = Some(summarize(&content));
                items[idx].content = Some(content);
                enriched += 1;
            }
        }
    }
    info!(enriched, total = items.len(), "Enriched items with page content");
}

async fn fetch_page_text(client: &Client, url: &str) -> Option<String> {
    let response = client.get(url).timeout(PAGE_TIMEOUT).send().await.ok()?;
    if !response.status().is_success() {
        debug!(%url, status = %response.status(), "Enrichment fetch rejected");
        return None;
    }
    let html = response.text().await.ok()?;
    Some(extract_text(&html))
}

/// Flatten a page to plain text: boilerplate subtrees are skipped entirely,
/// whitespace is collapsed, and the result is capped at 3000 characters.
fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut raw = String::new();
    let mut stack = vec![document.tree.root()];
    while let Some(node) = stack.pop() {
        match node.value() {
            Node::Element(el) if SKIP_TAGS.contains(&el.name()) => continue,
            Node::Text(text) => {
                raw.push_str(text);
                raw.push(' ');
            }
            _ => {}
        }
        // Reverse push keeps document order on the stack.
        for child in node.children().rev() {
            stack.push(child);
        }
    }

    let flattened = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    flattened.chars().take(CONTENT_MAX_CHARS).collect()
}

fn summarize(content: &str) -> String {
    if content.chars().count() > SUMMARY_MAX_CHARS {
        let head: String = content.chars().take(SUMMARY_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        content.to_string()
    }
}

/// Idempotent summary fallback: items still lacking a summary get one derived
/// from the title where the source format allows it. GitHub Trending titles
/// are "name - description", so the description half is used; otherwise the
/// summary stays unset rather than duplicating the title.
pub fn ensure_summary(items: &mut [Item]) {
    for item in items.iter_mut() {
        if item.summary.as_deref().is_some_and(|s| !s.is_empty()) {
            continue;
        }
        if item.source == "GitHub Trending" {
            if let Some((_, description)) = item.title.split_once(" - ") {
                let description = description.trim();
                if !description.is_empty() {
                    item.summary = Some(description.to_string());
                }
            }
        }
    }
}
