//! GitHub Trending scraper.
//!
//! Titles are emitted as `"owner/name - description"`; the summary fallback
//! later splits on the first `" - "` to recover the description half.

use crate::models::{FetchError, Item};
use crate::pipeline::filter_items;
use scraper::{Html, Selector};
use tracing::{info, instrument};

const TRENDING_URL: &str = "https://github.com/trending";

#[instrument(level = "info", skip(ctx, keyword))]
pub async fn fetch(
    ctx: &super::FetchContext,
    limit: usize,
    keyword: Option<&str>,
) -> Result<Vec<Item>, FetchError> {
    let html = ctx.client.get(TRENDING_URL).send().await?.text().await?;

    let mut items = filter_items(parse_trending(&html), keyword);
    items.truncate(limit);
    info!(count = items.len(), "Fetched GitHub trending repos");
    Ok(items)
}

fn parse_trending(html: &str) -> Vec<Item> {
    let document = Html::parse_document(html);
    let article_selector = Selector::parse("article.Box-row").unwrap();
    let repo_selector = Selector::parse("h2 a").unwrap();
    let desc_selector = Selector::parse("p").unwrap();
    let stars_selector = Selector::parse(r#"a[href$="/stargazers"]"#).unwrap();

    let mut items = Vec::new();
    for article in document.select(&article_selector) {
        let Some(repo_link) = article.select(&repo_selector).next() else {
            continue;
        };
        // The anchor text is "owner /\n  name" with decorative whitespace.
        let name = repo_link
            .text()
            .collect::<String>()
            .split_whitespace()
            .collect::<String>();
        if name.is_empty() {
            continue;
        }
        let Some(href) = repo_link.value().attr("href") else {
            continue;
        };
        let url = format!("https://github.com{href}");

        let description = article
            .select(&desc_selector)
            .next()
            .map(|p| p.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        let stars = article
            .select(&stars_selector)
            .next()
            .map(|a| a.text().collect::<String>().split_whitespace().collect::<String>())
            .unwrap_or_default();

        items.push(Item::new(
            "GitHub Trending",
            format!("{name} - {description}"),
            url,
            format!("{stars} stars"),
            "Today",
        ));
    }
    items
}
