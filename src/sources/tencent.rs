//! Tencent News tech-tag adapter. Keyless JSON endpoint, needs a `Referer`.
//! The feed exposes no popularity signal, so heat stays empty.

use crate::models::{FetchError, Item};
use crate::pipeline::filter_items;
use serde_json::Value;
use tracing::{info, instrument};

const TAG_URL: &str = "https://i.news.qq.com/web_backend/v2/getTagInfo?tagId=aEWqxLtdgmQ%3D";

#[instrument(level = "info", skip(ctx, keyword))]
pub async fn fetch(
    ctx: &super::FetchContext,
    limit: usize,
    keyword: Option<&str>,
) -> Result<Vec<Item>, FetchError> {
    let body = ctx
        .client
        .get(TAG_URL)
        .header("Referer", "https://news.qq.com/")
        .send()
        .await?
        .text()
        .await?;

    let mut items = filter_items(parse_response(&body)?, keyword);
    items.truncate(limit);
    info!(count = items.len(), "Fetched Tencent News articles");
    Ok(items)
}

fn parse_response(body: &str) -> Result<Vec<Item>, FetchError> {
    let data: Value = serde_json::from_str(body)?;
    let articles = data
        .get("data")
        .and_then(|d| d.get("tabs"))
        .and_then(|t| t.get(0))
        .and_then(|t| t.get("articleList"))
        .and_then(|l| l.as_array())
        .ok_or_else(|| FetchError::Parse("missing data.tabs[0].articleList".to_string()))?;

    let mut items = Vec::new();
    for article in articles {
        let title = article.get("title").and_then(|t| t.as_str()).unwrap_or_default();
        if title.is_empty() {
            continue;
        }
        let url = article
            .get("url")
            .and_then(|u| u.as_str())
            .or_else(|| {
                article
                    .get("link_info")
                    .and_then(|l| l.get("url"))
                    .and_then(|u| u.as_str())
            })
            .unwrap_or_default();
        let time = article
            .get("pub_time")
            .and_then(|t| t.as_str())
            .or_else(|| article.get("publish_time").and_then(|t| t.as_str()))
            .unwrap_or_default();

        items.push(Item::new("Tencent News", title, url, "", time));
    }
    Ok(items)
}
