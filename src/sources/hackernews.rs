//! Hacker News front-page scraper.
//!
//! Paginates through `news.ycombinator.com/news?p=N` until the requested
//! limit is reached or the page budget runs out, with a short sleep between
//! pages to avoid hammering the site. Score and age spans live outside the
//! `.athing` row, so they are looked up document-wide by story id.

use crate::models::{FetchError, Item};
use crate::pipeline::filter_items;
use scraper::{Html, Selector};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

const BASE_URL: &str = "https://news.ycombinator.com";
const MAX_PAGES: usize = 5;
const PAGE_DELAY: Duration = Duration::from_millis(500);

#[instrument(level = "info", skip(ctx, keyword))]
pub async fn fetch(
    ctx: &super::FetchContext,
    limit: usize,
    keyword: Option<&str>,
) -> Result<Vec<Item>, FetchError> {
    let mut items: Vec<Item> = Vec::new();

    for page in 1..=MAX_PAGES {
        let url = format!("{BASE_URL}/news?p={page}");
        let response = match ctx.client.get(&url).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                keep_partial_or_fail(&items, FetchError::Parse(format!("status {} for {url}", r.status())))?;
                warn!(%url, status = %r.status(), "Hacker News page fetch failed; keeping partial batch");
                break;
            }
            Err(e) => {
                keep_partial_or_fail(&items, e.into())?;
                warn!(%url, "Hacker News page fetch failed; keeping partial batch");
                break;
            }
        };
        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => {
                keep_partial_or_fail(&items, e.into())?;
                warn!(%url, "Hacker News body read failed; keeping partial batch");
                break;
            }
        };

        let page_items = parse_page(&html);
        if page_items.is_empty() {
            break;
        }
        debug!(page, count = page_items.len(), "Parsed Hacker News page");

        items.extend(filter_items(page_items, keyword));
        if items.len() >= limit {
            break;
        }
        sleep(PAGE_DELAY).await;
    }

    items.truncate(limit);
    info!(count = items.len(), "Fetched Hacker News items");
    Ok(items)
}

/// Later pages fail soft: whatever earlier pages produced is kept. A failure
/// with nothing gathered yet is a real adapter error.
fn keep_partial_or_fail(gathered: &[Item], error: FetchError) -> Result<(), FetchError> {
    if gathered.is_empty() {
        Err(error)
    } else {
        Ok(())
    }
}

fn parse_page(html: &str) -> Vec<Item> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse(".athing").unwrap();
    let title_selector = Selector::parse(".titleline a").unwrap();

    let mut items = Vec::new();
    for row in document.select(&row_selector) {
        let Some(id) = row.value().attr("id") else {
            continue;
        };
        let Some(title_link) = row.select(&title_selector).next() else {
            continue;
        };
        let title = title_link.text().collect::<String>();
        if title.trim().is_empty() {
            continue;
        }
        let mut link = title_link.value().attr("href").unwrap_or_default().to_string();
        if link.starts_with("item?id=") {
            link = format!("{BASE_URL}/{link}");
        }

        let score = Selector::parse(&format!("#score_{id}"))
            .ok()
            .and_then(|sel| {
                document
                    .select(&sel)
                    .next()
                    .map(|e| e.text().collect::<String>())
            })
            .unwrap_or_else(|| "0 points".to_string());

        let age = Selector::parse(&format!(r#".age a[href="item?id={id}"]"#))
            .ok()
            .and_then(|sel| {
                document
                    .select(&sel)
                    .next()
                    .map(|e| e.text().collect::<String>())
            })
            .unwrap_or_default();

        items.push(Item::new("Hacker News", title.trim(), link, score, age));
    }
    items
}
