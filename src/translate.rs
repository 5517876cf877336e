//! Title translation to Chinese via the keyless Google translate endpoint.
//!
//! A cheap script check short-circuits titles that already contain CJK
//! characters; everything else goes through the external service. Failures of
//! any kind return the original text; translation is best-effort and must
//! never lose a title.

use crate::models::{FetchError, Item};
use crate::utils::truncate_for_log;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde_json::Value;
use tracing::{info, instrument, warn};

/// Concurrent translation calls in flight at once.
pub const TRANSLATE_WORKERS: usize = 5;

const TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// Cheap script detection: does the text contain any CJK unified ideograph?
/// Not language identification; a single 汉字 is enough to skip translation.
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| ('\u{4e00}'..='\u{9fff}').contains(&c))
}

/// Translate a title to Chinese, returning the input unchanged when it
/// already contains CJK text or when the service call fails.
pub async fn translate_to_chinese(client: &Client, text: &str) -> String {
    if contains_cjk(text) {
        return text.to_string();
    }
    match request_translation(client, text).await {
        Ok(translated) if !translated.is_empty() => translated,
        Ok(_) => text.to_string(),
        Err(e) => {
            warn!(error = %e, text = %truncate_for_log(text, 80), "Translation failed; keeping original");
            text.to_string()
        }
    }
}

async fn request_translation(client: &Client, text: &str) -> Result<String, FetchError> {
    let body = client
        .get(TRANSLATE_URL)
        .query(&[
            ("client", "gtx"),
            ("sl", "auto"),
            ("tl", "zh-CN"),
            ("dt", "t"),
            ("q", text),
        ])
        .send()
        .await?
        .text()
        .await?;
    parse_translation(&body)
}

/// The gtx endpoint answers a nested array; the translated segments sit at
/// `[0][n][0]` and concatenate to the full translation.
fn parse_translation(body: &str) -> Result<String, FetchError> {
    let value: Value = serde_json::from_str(body)?;
    let segments = value
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| FetchError::Parse("unexpected translation shape".to_string()))?;
    Ok(segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(|s| s.as_str()))
        .collect())
}

/// Translate all titles still in a foreign script, concurrently, writing
/// results back in place. A failed individual translation leaves that item's
/// title as fetched.
#[instrument(level = "info", skip_all, fields(count = items.len()))]
pub async fn batch_translate(client: &Client, items: &mut [Item]) {
    let targets: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| !contains_cjk(&item.title))
        .map(|(i, _)| i)
        .collect();
    if targets.is_empty() {
        return;
    }
    info!(count = targets.len(), "Translating titles to Chinese");

    let translated: Vec<(usize, String)> = stream::iter(targets)
        .map(|idx| {
            let title = items[idx].title.clone();
            let client = client.clone();
            async move { (idx, translate_to_chinese(&client, &title).await) }
        })
        .buffer_unordered(TRANSLATE_WORKERS)
        .collect()
        .await;

    for (idx, title) in translated {
        items[idx].title = title;
    }
}
