//! Source adapters for fetching hot items from external services.
//!
//! Each adapter follows the same contract: `fetch(ctx, limit, keyword)`
//! issues one or more HTTP requests with a short timeout, parses the response
//! with source-specific selectors or key paths, maps raw records into
//! [`Item`]s, applies the keyword filter to the locally parsed batch, and caps
//! the result at `limit`. Any failure surfaces as a [`FetchError`] that the
//! fan-out coordinator interprets as "contributes nothing".
//!
//! # Supported sources
//!
//! | Key | Module | Method | Heat signal |
//! |-----|--------|--------|-------------|
//! | `hackernews` | [`hackernews`] | HTML, paginated | "N points" |
//! | `weibo` | [`weibo`] | JSON API | view count |
//! | `github` | [`github`] | HTML scraping | "N stars" |
//! | `36kr` | [`kr36`] | HTML scraping | none |
//! | `v2ex` | [`v2ex`] | JSON API | "N replies" |
//! | `tencent` | [`tencent`] | JSON API | none |
//! | `wallstreetcn` | [`wallstreetcn`] | JSON API | none |
//! | `producthunt` | [`producthunt`] | RSS feed | "Top Product" |
//! | `x_social` | [`x_social`] | Nitter RSS fan-out | "New" |

use crate::config::AppConfig;
use crate::models::{FetchError, Item};
use reqwest::Client;
use std::time::Duration;

pub mod feed;
pub mod github;
pub mod hackernews;
pub mod kr36;
pub mod producthunt;
pub mod tencent;
pub mod v2ex;
pub mod wallstreetcn;
pub mod weibo;
pub mod x_social;

/// Browser User-Agent sent with scraping requests to avoid basic bot detection.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default per-request timeout for API-style endpoints.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything an adapter needs to run: a shared HTTP client plus the injected
/// configuration for the social-post fan-out. `shuffle_seed` makes the mirror
/// rotation and the final post shuffle deterministic in tests.
#[derive(Debug, Clone)]
pub struct FetchContext {
    pub client: Client,
    pub x_accounts: Vec<(String, String)>,
    pub nitter_instances: Vec<String>,
    pub shuffle_seed: Option<u64>,
}

impl FetchContext {
    pub fn new(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            x_accounts: config.x_accounts.clone(),
            nitter_instances: config.nitter_instances.clone(),
            shuffle_seed: None,
        })
    }
}

/// Identifier for one source adapter; dispatches to the per-source modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceId {
    HackerNews,
    Weibo,
    Github,
    Kr36,
    V2ex,
    Tencent,
    WallStreetCn,
    ProductHunt,
    XSocial,
}

impl SourceId {
    /// Every known adapter, in registry order.
    pub fn all() -> [SourceId; 9] {
        [
            SourceId::HackerNews,
            SourceId::Weibo,
            SourceId::Github,
            SourceId::Kr36,
            SourceId::V2ex,
            SourceId::Tencent,
            SourceId::WallStreetCn,
            SourceId::ProductHunt,
            SourceId::XSocial,
        ]
    }

    /// Configuration key for this adapter.
    pub fn key(&self) -> &'static str {
        match self {
            SourceId::HackerNews => "hackernews",
            SourceId::Weibo => "weibo",
            SourceId::Github => "github",
            SourceId::Kr36 => "36kr",
            SourceId::V2ex => "v2ex",
            SourceId::Tencent => "tencent",
            SourceId::WallStreetCn => "wallstreetcn",
            SourceId::ProductHunt => "producthunt",
            SourceId::XSocial => "x_social",
        }
    }

    pub fn from_key(key: &str) -> Option<SourceId> {
        SourceId::all().into_iter().find(|s| s.key() == key)
    }

    /// Run this adapter. Bounded result count, never panics; failures come
    /// back as `Err` and are swallowed by the coordinator.
    pub async fn fetch(
        &self,
        ctx: &FetchContext,
        limit: usize,
        keyword: Option<&str>,
    ) -> Result<Vec<Item>, FetchError> {
        match self {
            SourceId::HackerNews => hackernews::fetch(ctx, limit, keyword).await,
            SourceId::Weibo => weibo::fetch(ctx, limit, keyword).await,
            SourceId::Github => github::fetch(ctx, limit, keyword).await,
            SourceId::Kr36 => kr36::fetch(ctx, limit, keyword).await,
            SourceId::V2ex => v2ex::fetch(ctx, limit, keyword).await,
            SourceId::Tencent => tencent::fetch(ctx, limit, keyword).await,
            SourceId::WallStreetCn => wallstreetcn::fetch(ctx, limit, keyword).await,
            SourceId::ProductHunt => producthunt::fetch(ctx, limit, keyword).await,
            SourceId::XSocial => x_social::fetch(ctx, limit, keyword).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        for id in SourceId::all() {
            assert_eq!(SourceId::from_key(id.key()), Some(id));
        }
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(SourceId::from_key("digg"), None);
    }
}
