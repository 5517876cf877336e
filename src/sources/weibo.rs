//! Weibo hot-search adapter.
//!
//! Uses the PC Ajax API, which returns JSON directly and is less rate-limited
//! than scraping the search frontend. Requires a `Referer` header.

use crate::models::{FetchError, Item};
use crate::pipeline::filter_items;
use serde_json::Value;
use tracing::{info, instrument};

const API_URL: &str = "https://weibo.com/ajax/side/hotSearch";

#[instrument(level = "info", skip(ctx, keyword))]
pub async fn fetch(
    ctx: &super::FetchContext,
    limit: usize,
    keyword: Option<&str>,
) -> Result<Vec<Item>, FetchError> {
    let body = ctx
        .client
        .get(API_URL)
        .header("Referer", "https://weibo.com/")
        .send()
        .await?
        .text()
        .await?;

    let mut items = parse_response(&body)?;
    items = filter_items(items, keyword);
    items.truncate(limit);
    info!(count = items.len(), "Fetched Weibo hot search items");
    Ok(items)
}

fn parse_response(body: &str) -> Result<Vec<Item>, FetchError> {
    let data: Value = serde_json::from_str(body)?;
    let realtime = data
        .get("data")
        .and_then(|d| d.get("realtime"))
        .and_then(|r| r.as_array())
        .ok_or_else(|| FetchError::Parse("missing data.realtime".to_string()))?;

    let mut items = Vec::new();
    for entry in realtime {
        // "note" is usually the display title, sometimes only "word" is set.
        let title = entry
            .get("note")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .or_else(|| entry.get("word").and_then(|v| v.as_str()))
            .unwrap_or_default();
        if title.is_empty() {
            continue;
        }

        // "num" is usually a JSON number but has been seen as a string too.
        let heat = entry
            .get("num")
            .and_then(|n| n.as_u64().map(|v| v.to_string()).or_else(|| n.as_str().map(String::from)))
            .unwrap_or_else(|| "0".to_string());

        let url = format!(
            "https://s.weibo.com/weibo?q={}&Refer=top",
            urlencoding::encode(title)
        );

        items.push(Item::new("Weibo Hot Search", title, url, heat, "Real-time"));
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
      "data": { "realtime": [
        {"note": "某话题冲上热搜", "num": 1500000},
        {"word": "备用词条", "num": 35000},
        {"note": "", "word": "", "num": 1}
      ]}
    }"#;

    #[test]
    fn test_parse_response() {
        let items = parse_response(BODY).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "某话题冲上热搜");
        assert_eq!(items[0].heat, "1500000");
        assert_eq!(items[0].time, "Real-time");
        assert!(items[0].url.contains("s.weibo.com"));
        assert_eq!(items[1].title, "备用词条");
    }

    #[test]
    fn test_title_is_percent_encoded_in_url() {
        let items = parse_response(BODY).unwrap();
        assert!(!items[0].url.contains("某"));
        assert!(items[0].url.contains("%E6"));
    }

    #[test]
    fn test_string_num_has_no_quotes() {
        let body = r#"{"data": {"realtime": [{"note": "词条", "num": "35000"}]}}"#;
        let items = parse_response(body).unwrap();
        assert_eq!(items[0].heat, "35000");
    }

    #[test]
    fn test_missing_num_defaults_to_zero() {
        let body = r#"{"data": {"realtime": [{"note": "词条"}]}}"#;
        let items = parse_response(body).unwrap();
        assert_eq!(items[0].heat, "0");
    }

    #[test]
    fn test_missing_realtime_is_parse_error() {
        assert!(parse_response(r#"{"data": {}}"#).is_err());
        assert!(parse_response("not json").is_err());
    }
}
