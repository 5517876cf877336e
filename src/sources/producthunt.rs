//! Product Hunt adapter, backed by the public RSS feed (no API key needed).
//! The feed implies a top ranking, so every entry carries a "Top Product" heat.

use crate::models::{FetchError, Item};
use crate::pipeline::filter_items;
use crate::sources::feed::{parse_feed, FeedEntry};
use tracing::{info, instrument};

const FEED_URL: &str = "https://www.producthunt.com/feed";

#[instrument(level = "info", skip(ctx, keyword))]
pub async fn fetch(
    ctx: &super::FetchContext,
    limit: usize,
    keyword: Option<&str>,
) -> Result<Vec<Item>, FetchError> {
    let xml = ctx.client.get(FEED_URL).send().await?.text().await?;

    let entries = parse_feed(&xml);
    if entries.is_empty() {
        return Err(FetchError::Parse("no feed entries".to_string()));
    }

    let mut items = filter_items(entries.into_iter().map(to_item).collect(), keyword);
    items.truncate(limit);
    info!(count = items.len(), "Fetched Product Hunt items");
    Ok(items)
}

fn to_item(entry: FeedEntry) -> Item {
    Item::new(
        "Product Hunt",
        entry.title.trim(),
        entry.link,
        "Top Product",
        entry.published,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_item() {
        let entry = FeedEntry {
            title: "  Launchy — a thing  ".to_string(),
            link: "https://www.producthunt.com/posts/launchy".to_string(),
            description: String::new(),
            published: "Thu, 22 Jan 2026 08:01:00 GMT".to_string(),
        };
        let item = to_item(entry);
        assert_eq!(item.title, "Launchy — a thing");
        assert_eq!(item.heat, "Top Product");
        assert_eq!(item.time, "Thu, 22 Jan 2026 08:01:00 GMT");
    }
}
