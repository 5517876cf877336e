//! 36Kr newsflash scraper. No heat signal on this source.

use crate::models::{FetchError, Item};
use crate::pipeline::filter_items;
use scraper::{Html, Selector};
use tracing::{info, instrument};

const NEWSFLASH_URL: &str = "https://36kr.com/newsflashes";

#[instrument(level = "info", skip(ctx, keyword))]
pub async fn fetch(
    ctx: &super::FetchContext,
    limit: usize,
    keyword: Option<&str>,
) -> Result<Vec<Item>, FetchError> {
    let html = ctx.client.get(NEWSFLASH_URL).send().await?.text().await?;

    let mut items = filter_items(parse_newsflashes(&html), keyword);
    items.truncate(limit);
    info!(count = items.len(), "Fetched 36Kr newsflashes");
    Ok(items)
}

fn parse_newsflashes(html: &str) -> Vec<Item> {
    let document = Html::parse_document(html);
    let item_selector = Selector::parse(".newsflash-item").unwrap();
    let title_selector = Selector::parse(".item-title").unwrap();
    let time_selector = Selector::parse(".time").unwrap();

    let mut items = Vec::new();
    for flash in document.select(&item_selector) {
        let Some(title_el) = flash.select(&title_selector).next() else {
            continue;
        };
        let title = title_el.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }
        let href = title_el.value().attr("href").unwrap_or_default();
        let url = if href.starts_with("http") {
            href.to_string()
        } else {
            format!("https://36kr.com{href}")
        };
        let time = flash
            .select(&time_selector)
            .next()
            .map(|t| t.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        items.push(Item::new("36Kr", title, url, "", time));
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
      <div class="newsflash-item">
        <a class="item-title" href="/newsflashes/12345">某公司完成新一轮融资</a>
        <span class="time">10分钟前</span>
      </div>
      <div class="newsflash-item">
        <a class="item-title" href="https://36kr.com/newsflashes/67890">另一条快讯</a>
      </div>
    </body></html>"#;

    #[test]
    fn test_parse_newsflashes() {
        let items = parse_newsflashes(PAGE);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "某公司完成新一轮融资");
        assert_eq!(items[0].url, "https://36kr.com/newsflashes/12345");
        assert_eq!(items[0].time, "10分钟前");
        assert_eq!(items[0].heat, "");
    }

    #[test]
    fn test_absolute_hrefs_pass_through() {
        let items = parse_newsflashes(PAGE);
        assert_eq!(items[1].url, "https://36kr.com/newsflashes/67890");
        assert_eq!(items[1].time, "");
    }
}
