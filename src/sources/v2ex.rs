//! V2EX hot-topics adapter, backed by the public JSON API.

use crate::models::{FetchError, Item};
use crate::pipeline::filter_items;
use serde_json::Value;
use tracing::{info, instrument};

const HOT_TOPICS_URL: &str = "https://www.v2ex.com/api/topics/hot.json";

#[instrument(level = "info", skip(ctx, keyword))]
pub async fn fetch(
    ctx: &super::FetchContext,
    limit: usize,
    keyword: Option<&str>,
) -> Result<Vec<Item>, FetchError> {
    let body = ctx.client.get(HOT_TOPICS_URL).send().await?.text().await?;

    let mut items = filter_items(parse_topics(&body)?, keyword);
    items.truncate(limit);
    info!(count = items.len(), "Fetched V2EX hot topics");
    Ok(items)
}

fn parse_topics(body: &str) -> Result<Vec<Item>, FetchError> {
    let topics: Value = serde_json::from_str(body)?;
    let topics = topics
        .as_array()
        .ok_or_else(|| FetchError::Parse("expected a topic array".to_string()))?;

    let mut items = Vec::new();
    for topic in topics {
        let title = topic.get("title").and_then(|t| t.as_str()).unwrap_or_default();
        if title.is_empty() {
            continue;
        }
        let url = topic.get("url").and_then(|u| u.as_str()).unwrap_or_default();
        let replies = topic.get("replies").and_then(|r| r.as_u64()).unwrap_or(0);

        items.push(Item::new("V2EX", title, url, format!("{replies} replies"), "Hot"));
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"[
      {"title": "一个热门话题", "url": "https://www.v2ex.com/t/1", "replies": 50},
      {"title": "Another topic", "url": "https://www.v2ex.com/t/2"},
      {"url": "https://www.v2ex.com/t/3", "replies": 9}
    ]"#;

    #[test]
    fn test_parse_topics() {
        let items = parse_topics(BODY).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].heat, "50 replies");
        assert_eq!(items[0].time, "Hot");
        assert_eq!(items[1].heat, "0 replies");
    }

    #[test]
    fn test_untitled_topics_are_dropped() {
        let items = parse_topics(BODY).unwrap();
        assert!(items.iter().all(|i| !i.title.is_empty()));
    }

    #[test]
    fn test_non_array_is_parse_error() {
        assert!(parse_topics(r#"{"error": "rate limited"}"#).is_err());
    }
}
