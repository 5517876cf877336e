//! X (Twitter) adapter with a two-level fan-out over curated accounts.
//!
//! For each `(handle, category)` pair the configured Nitter mirrors are tried
//! in randomized order until one yields a parseable RSS feed; the 5 most
//! recent posts per handle are kept. Handles are fetched concurrently, and
//! the combined pool is shuffled before truncation; the feed is presented as
//! "discovery", not a timeline. The shuffles draw from a seedable RNG so
//! tests can pin the order.

use crate::models::{FetchError, Item};
use crate::pipeline::filter_items;
use crate::sources::feed::{parse_feed, strip_html};
use futures::stream::{self, StreamExt};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Concurrent per-handle fetches in flight at once.
pub const HANDLE_WORKERS: usize = 10;
const POSTS_PER_HANDLE: usize = 5;
const MIRROR_TIMEOUT: Duration = Duration::from_secs(8);

fn rng_for(seed: Option<u64>, salt: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(salt)),
        None => StdRng::from_os_rng(),
    }
}

#[instrument(level = "info", skip(ctx, keyword))]
pub async fn fetch(
    ctx: &super::FetchContext,
    limit: usize,
    keyword: Option<&str>,
) -> Result<Vec<Item>, FetchError> {
    if ctx.x_accounts.is_empty() || ctx.nitter_instances.is_empty() {
        return Ok(Vec::new());
    }
    info!(accounts = ctx.x_accounts.len(), "Fetching X feeds");

    let per_handle: Vec<Vec<Item>> = stream::iter(ctx.x_accounts.clone().into_iter().enumerate())
        .map(|(i, (handle, category))| {
            let mut mirrors = ctx.nitter_instances.clone();
            mirrors.shuffle(&mut rng_for(ctx.shuffle_seed, i as u64));
            let client = &ctx.client;
            async move { fetch_handle(client, &handle, &category, &mirrors).await }
        })
        .buffer_unordered(HANDLE_WORKERS)
        .collect()
        .await;

    let mut posts: Vec<Item> = per_handle.into_iter().flatten().collect();
    posts = filter_items(posts, keyword);
    posts.shuffle(&mut rng_for(ctx.shuffle_seed, u64::from(u32::MAX)));
    posts.truncate(limit);
    info!(count = posts.len(), "Fetched X posts");
    Ok(posts)
}

/// Try each mirror in the given order until one yields posts. A handle whose
/// mirrors all fail contributes nothing; that is not an adapter failure.
async fn fetch_handle(client: &Client, handle: &str, category: &str, mirrors: &[String]) -> Vec<Item> {
    for mirror in mirrors {
        let url = format!("https://{mirror}/{handle}/rss");
        let xml = match client.get(&url).timeout(MIRROR_TIMEOUT).send().await {
            Ok(resp) if resp.status().is_success() => match resp.text().await {
                Ok(xml) => xml,
                Err(_) => continue,
            },
            _ => continue,
        };
        let posts = parse_posts(&xml, handle, category);
        if !posts.is_empty() {
            debug!(handle, mirror, count = posts.len(), "Mirror yielded posts");
            return posts;
        }
    }
    warn!(handle, "All mirrors failed for handle");
    Vec::new()
}

fn parse_posts(xml: &str, handle: &str, category: &str) -> Vec<Item> {
    parse_feed(xml)
        .into_iter()
        .take(POSTS_PER_HANDLE)
        .map(|entry| {
            let image = entry
                .description
                .split_once("<img src=\"")
                .and_then(|(_, rest)| rest.split_once('"'))
                .map(|(src, _)| src.to_string());
            let text = strip_html(&entry.description);

            let snippet: String = text.chars().take(100).collect();
            let mut item = Item::new(
                "X (Twitter)",
                format!("@{handle}: {snippet}..."),
                rewrite_status_link(&entry.link, handle),
                "New",
                entry.published,
            );
            item.summary = Some(text);
            item.author = Some(handle.to_string());
            item.category = Some(category.to_string());
            item.image = image;
            item
        })
        .collect()
}

/// Rewrite a Nitter status link (`https://mirror/user/status/id#m`) to the
/// canonical `x.com` form. Non-status links pass through unchanged.
fn rewrite_status_link(link: &str, handle: &str) -> String {
    match link.split_once("/status/") {
        Some((_, rest)) => {
            let id = rest.split('#').next().unwrap_or(rest);
            format!("https://x.com/{handle}/status/{id}")
        }
        None => link.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>@tester</title>
  <item>
    <title>post one</title>
    <link>https://nitter.net/tester/status/111#m</link>
    <description><![CDATA[Hello <b>world</b> <img src="https://pic.example/1.jpg"/>]]></description>
    <pubDate>Wed, 22 Jan 2026 12:00:00 GMT</pubDate>
  </item>
  <item>
    <title>post two</title>
    <link>https://nitter.net/tester/status/222</link>
    <description>No image here</description>
    <pubDate>Wed, 22 Jan 2026 11:00:00 GMT</pubDate>
  </item>
</channel></rss>"#;

    #[test]
    fn test_parse_posts() {
        let posts = parse_posts(FEED, "tester", "AI Research");
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].url, "https://x.com/tester/status/111");
        assert!(posts[0].title.starts_with("@tester: Hello world"));
        assert_eq!(posts[0].heat, "New");
        assert_eq!(posts[0].author.as_deref(), Some("tester"));
        assert_eq!(posts[0].category.as_deref(), Some("AI Research"));
        assert_eq!(posts[0].image.as_deref(), Some("https://pic.example/1.jpg"));
        assert!(posts[1].image.is_none());
    }

    #[test]
    fn test_full_text_lands_in_summary() {
        let posts = parse_posts(FEED, "tester", "AI Research");
        assert_eq!(posts[1].summary.as_deref(), Some("No image here"));
    }

    #[test]
    fn test_rewrite_status_link() {
        assert_eq!(
            rewrite_status_link("https://nitter.net/u/status/99#m", "u"),
            "https://x.com/u/status/99"
        );
        assert_eq!(
            rewrite_status_link("https://example.com/about", "u"),
            "https://example.com/about"
        );
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let mut a: Vec<u32> = (0..10).collect();
        let mut b: Vec<u32> = (0..10).collect();
        a.shuffle(&mut rng_for(Some(42), 7));
        b.shuffle(&mut rng_for(Some(42), 7));
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_empty_config_short_circuits() {
        let config = crate::config::AppConfig {
            scenarios: Vec::new(),
            x_accounts: Vec::new(),
            nitter_instances: Vec::new(),
        };
        let ctx = crate::sources::FetchContext::new(&config).unwrap();
        let items = fetch(&ctx, 15, None).await.unwrap();
        assert!(items.is_empty());
    }
}
