//! Wall Street CN information-flow adapter.
//!
//! `display_time` arrives as unix seconds and is formatted as a Beijing-time
//! "HH:MM" stamp for display; it is never used for ordering.

use crate::models::{FetchError, Item};
use crate::pipeline::filter_items;
use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use tracing::{info, instrument};

const FLOW_URL: &str = "https://api-one.wallstcn.com/apiv1/content/information-flow?channel=global-channel&accept=article&limit=30";

#[instrument(level = "info", skip(ctx, keyword))]
pub async fn fetch(
    ctx: &super::FetchContext,
    limit: usize,
    keyword: Option<&str>,
) -> Result<Vec<Item>, FetchError> {
    let body = ctx.client.get(FLOW_URL).send().await?.text().await?;

    let mut items = filter_items(parse_response(&body)?, keyword);
    items.truncate(limit);
    info!(count = items.len(), "Fetched Wall Street CN articles");
    Ok(items)
}

fn beijing_hhmm(ts: i64) -> String {
    let Some(offset) = FixedOffset::east_opt(8 * 3600) else {
        return String::new();
    };
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.with_timezone(&offset).format("%H:%M").to_string())
        .unwrap_or_default()
}

fn parse_response(body: &str) -> Result<Vec<Item>, FetchError> {
    let data: Value = serde_json::from_str(body)?;
    let entries = data
        .get("data")
        .and_then(|d| d.get("items"))
        .and_then(|i| i.as_array())
        .ok_or_else(|| FetchError::Parse("missing data.items".to_string()))?;

    let mut items = Vec::new();
    for entry in entries {
        let Some(resource) = entry.get("resource") else {
            continue;
        };
        let title = resource
            .get("title")
            .and_then(|t| t.as_str())
            .filter(|s| !s.is_empty())
            .or_else(|| resource.get("content_short").and_then(|t| t.as_str()))
            .unwrap_or_default();
        if title.is_empty() {
            continue;
        }
        let url = resource.get("uri").and_then(|u| u.as_str()).unwrap_or_default();
        let time = resource
            .get("display_time")
            .and_then(|t| t.as_i64())
            .map(beijing_hhmm)
            .unwrap_or_default();

        items.push(Item::new("Wall Street CN", title, url, "", time));
    }
    Ok(items)
}
