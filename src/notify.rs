//! Optional push notification via the Bark service.
//!
//! Fires once per run after the dashboard is published. A missing
//! `BARK_KEY` disables it; delivery failures are logged and never fail
//! the pipeline.

use reqwest::Client;
use std::time::Duration;
use tracing::{info, instrument, warn};

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolve the public URL carried in the notification. A GitHub Actions
/// run derives it from `GITHUB_REPOSITORY` ("user/repo" becomes the
/// Pages URL); otherwise `GITHUB_PAGES_URL` is used verbatim.
fn pages_url(repository: Option<&str>, fallback: Option<&str>) -> String {
    if let Some((user, repo)) = repository.and_then(|r| r.split_once('/')) {
        return format!("https://{user}.github.io/{repo}/");
    }
    fallback.unwrap_or("").to_string()
}

#[instrument(level = "info", skip_all, fields(%date))]
pub async fn send_bark_notification(client: &Client, date: &str) {
    let Ok(key) = std::env::var("BARK_KEY") else {
        info!("BARK_KEY not set, skipping push notification");
        return;
    };
    if key.is_empty() {
        info!("BARK_KEY is empty, skipping push notification");
        return;
    }

    let url = pages_url(
        std::env::var("GITHUB_REPOSITORY").ok().as_deref(),
        std::env::var("GITHUB_PAGES_URL").ok().as_deref(),
    );

    let title = format!("📰 今日热点已更新 {date}");
    let body = "点击查看今日全网热点聚合";
    let endpoint = format!(
        "https://api.day.app/{key}/{}/{}",
        urlencoding::encode(&title),
        urlencoding::encode(body),
    );

    let result = client
        .get(&endpoint)
        .query(&[("url", url.as_str()), ("group", "DailyNews"), ("sound", "minuet")])
        .timeout(NOTIFY_TIMEOUT)
        .send()
        .await;

    match result {
        Ok(response) if response.status().is_success() => {
            info!("Bark notification sent")
        }
        Ok(response) => warn!(status = %response.status(), "Bark notification rejected"),
        Err(error) => warn!(%error, "Bark notification failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_url_from_repository() {
        assert_eq!(
            pages_url(Some("alice/hotdash"), None),
            "https://alice.github.io/hotdash/"
        );
    }

    #[test]
    fn test_pages_url_repository_wins_over_fallback() {
        assert_eq!(
            pages_url(Some("alice/hotdash"), Some("https://example.com/")),
            "https://alice.github.io/hotdash/"
        );
    }

    #[test]
    fn test_pages_url_fallback() {
        assert_eq!(pages_url(None, Some("https://example.com/")), "https://example.com/");
        assert_eq!(pages_url(Some("not-a-repo"), None), "");
        assert_eq!(pages_url(None, None), "");
    }
}
