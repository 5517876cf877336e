//! The scenario pipeline: keyword filtering, the fan-out fetch coordinator,
//! and the orchestrator that runs one scenario end to end.
//!
//! The stage order is fixed and linear:
//!
//! ```text
//! fetch -> enrich? -> summarize-fallback -> translate? -> tag -> score+rank -> truncate
//! ```
//!
//! Each stage drains its own bounded worker pool before the next one starts;
//! there is no pipelining between stages and no global deadline. Per-adapter
//! and per-item failures are swallowed at their own boundary; the only error
//! this module surfaces is an unknown scenario key, which must fail the whole
//! invocation loudly rather than render misleading output.

use crate::config::AppConfig;
use crate::enrich::{enrich_items, ensure_summary};
use crate::models::{FetchError, Item};
use crate::rank::{rank_items, tag_practicality};
use crate::sources::{FetchContext, SourceId};
use crate::translate::batch_translate;
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use std::error::Error;
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// Concurrent adapter fetches in flight at once.
pub const FETCH_WORKERS: usize = 5;

/// Per-run knobs read once from the environment/CLI before a run starts.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Per-scenario result cap, applied both per adapter and after ranking.
    pub limit: usize,
    /// Fetch and summarize linked page content.
    pub deep: bool,
    /// Translate titles to Chinese.
    pub translate: bool,
}

/// Configuration errors that must fail the invocation loudly.
#[derive(Debug)]
pub enum ScenarioError {
    UnknownScenario(String),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::UnknownScenario(key) => write!(f, "unknown scenario key: {key}"),
        }
    }
}

impl Error for ScenarioError {}

/// Narrow items to those whose title matches the comma-separated keyword spec.
///
/// An empty or absent spec is the identity function. Matching is a plain
/// case-insensitive substring check, which works uniformly for Latin and CJK
/// keywords: no tokenization, no stemming.
pub fn filter_items(items: Vec<Item>, keyword: Option<&str>) -> Vec<Item> {
    let Some(spec) = keyword else {
        return items;
    };
    let keywords: Vec<String> = spec
        .split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();
    if keywords.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| {
            let title = item.title.to_lowercase();
            keywords.iter().any(|k| title.contains(k.as_str()))
        })
        .collect()
}

/// Run every adapter fetch through a bounded pool and merge whatever succeeds.
///
/// An adapter that returns an error contributes nothing; the rest of the pool
/// runs to completion. Merge order is completion order; callers must not rely
/// on it, the ranker imposes the final total order.
pub async fn merge_fetches(
    fetches: Vec<(&'static str, BoxFuture<'_, Result<Vec<Item>, FetchError>>)>,
) -> Vec<Item> {
    stream::iter(fetches)
        .map(|(name, fetch)| async move {
            match fetch.await {
                Ok(items) => {
                    debug!(source = name, count = items.len(), "Adapter returned items");
                    items
                }
                Err(e) => {
                    warn!(source = name, error = %e, "Adapter failed; contributing nothing");
                    Vec::new()
                }
            }
        })
        .buffer_unordered(FETCH_WORKERS)
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .flatten()
        .collect()
}

/// Resolve a scenario's source list to adapter ids. The `"all"` sentinel
/// selects every known adapter; unknown keys are logged and skipped.
fn resolve_sources(sources: &[String]) -> Vec<SourceId> {
    if sources.iter().any(|s| s == "all") {
        return SourceId::all().to_vec();
    }
    sources
        .iter()
        .filter_map(|s| {
            let id = SourceId::from_key(s);
            if id.is_none() {
                warn!(source = %s, "Unknown source key in scenario config; skipping");
            }
            id
        })
        .collect()
}

/// Run one scenario end to end and return its ranked, truncated items.
///
/// Zero items is a normal outcome (the renderer shows an empty state for it);
/// only an unknown scenario key is an error.
#[instrument(level = "info", skip(config, ctx, opts), fields(scenario = %key))]
pub async fn fetch_scenario(
    config: &AppConfig,
    ctx: &FetchContext,
    key: &str,
    opts: &PipelineOptions,
) -> Result<Vec<Item>, ScenarioError> {
    let scenario = config
        .scenario(key)
        .ok_or_else(|| ScenarioError::UnknownScenario(key.to_string()))?;

    let sources = resolve_sources(&scenario.sources);
    let keyword_spec = scenario.keyword_spec();

    let fetches: Vec<_> = sources
        .iter()
        .map(|source| {
            let id = *source;
            let spec = keyword_spec.clone();
            (
                id.key(),
                async move { id.fetch(ctx, opts.limit, spec.as_deref()).await }.boxed(),
            )
        })
        .collect();

    let mut items = merge_fetches(fetches).await;
    info!(count = items.len(), sources = sources.len(), "Merged adapter results");

    if opts.deep && !items.is_empty() {
        enrich_items(&ctx.client, &mut items).await;
    }
    ensure_summary(&mut items);
    if opts.translate && !items.is_empty() {
        batch_translate(&ctx.client, &mut items).await;
    }
    tag_practicality(&mut items);
    rank_items(&mut items);
    items.truncate(opts.limit);

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    fn item(title: &str, heat: &str) -> Item {
        Item::new("Test", title, "", heat, "")
    }

    #[test]
    fn test_filter_none_is_identity() {
        let items = vec![item("Alpha", ""), item("Beta", "")];
        let filtered = filter_items(items.clone(), None);
        assert_eq!(filtered.len(), 2);
        let filtered = filter_items(items, Some(""));
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_filter_case_insensitive_substring() {
        let items = vec![
            item("OpenAI ships a new model", ""),
            item("Rust 1.85 released", ""),
            item("gpt-5 rumors", ""),
        ];
        let filtered = filter_items(items, Some("AI,GPT"));
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|i| {
            let t = i.title.to_lowercase();
            t.contains("ai") || t.contains("gpt")
        }));
    }

    #[test]
    fn test_filter_cjk_keyword() {
        let items = vec![item("腾讯发布新模型", ""), item("Plain English title", "")];
        let filtered = filter_items(items, Some("模型"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "腾讯发布新模型");
    }

    #[test]
    fn test_filter_trims_spec_entries() {
        let items = vec![item("A story about agents", "")];
        let filtered = filter_items(items, Some(" agent , , "));
        assert_eq!(filtered.len(), 1);
    }

    #[tokio::test]
    async fn test_merge_fetches_swallows_failures() {
        let a = vec![item("a1", "10 points"), item("a2", "20 points")];
        let fetches: Vec<(&'static str, futures::future::BoxFuture<'_, _>)> = vec![
            ("a", async move { Ok(a) }.boxed()),
            (
                "b",
                async move { Err(FetchError::Parse("selectors changed".into())) }.boxed(),
            ),
        ];
        let merged = merge_fetches(fetches).await;
        assert_eq!(merged.len(), 2);
    }

    #[tokio::test]
    async fn test_merge_rank_truncate_end_to_end() {
        // Adapter A: five items, B: simulated failure, C: two items.
        let a: Vec<Item> = ["10 points", "500 points", "3 points", "1万", "replies 5"]
            .iter()
            .enumerate()
            .map(|(i, heat)| item(&format!("a{i}"), heat))
            .collect();
        let c: Vec<Item> = ["", "200 points"]
            .iter()
            .enumerate()
            .map(|(i, heat)| item(&format!("c{i}"), heat))
            .collect();

        let fetches: Vec<(&'static str, futures::future::BoxFuture<'_, _>)> = vec![
            ("a", async move { Ok(a) }.boxed()),
            ("b", async move { Err(FetchError::Parse("down".into())) }.boxed()),
            ("c", async move { Ok(c) }.boxed()),
        ];
        let mut merged = merge_fetches(fetches).await;
        assert_eq!(merged.len(), 7);

        rank_items(&mut merged);
        merged.truncate(4);

        assert_eq!(merged.len(), 4);
        assert_eq!(merged[0].heat, "1万");
        assert_eq!(merged[0].heat_score, Some(10_000.0));
        // Descending among the rest.
        for pair in merged.windows(2) {
            assert!(pair[0].heat_score >= pair[1].heat_score);
        }
    }

    #[tokio::test]
    async fn test_truncation_takes_global_top_n() {
        // Two adapters collectively produce more than the limit; the output
        // must be the top-N of the union, not a prefix of either adapter.
        let a: Vec<Item> = (0..5).map(|i| item(&format!("a{i}"), "1 points")).collect();
        let b: Vec<Item> = (0..5).map(|i| item(&format!("b{i}"), "100 points")).collect();
        let fetches: Vec<(&'static str, futures::future::BoxFuture<'_, _>)> = vec![
            ("a", async move { Ok(a) }.boxed()),
            ("b", async move { Ok(b) }.boxed()),
        ];
        let mut merged = merge_fetches(fetches).await;
        rank_items(&mut merged);
        merged.truncate(5);
        assert_eq!(merged.len(), 5);
        assert!(merged.iter().all(|i| i.heat == "100 points"));
    }

    #[test]
    fn test_resolve_sources_all_sentinel() {
        let sources = vec!["all".to_string()];
        assert_eq!(resolve_sources(&sources).len(), SourceId::all().len());
    }

    #[test]
    fn test_resolve_sources_skips_unknown() {
        let sources = vec!["hackernews".to_string(), "myspace".to_string()];
        let resolved = resolve_sources(&sources);
        assert_eq!(resolved, vec![SourceId::HackerNews]);
    }

    #[test]
    fn test_unknown_scenario_errors() {
        let e = ScenarioError::UnknownScenario("sports".to_string());
        assert_eq!(e.to_string(), "unknown scenario key: sports");
    }

    #[tokio::test]
    async fn test_fetch_scenario_rejects_unknown_key() {
        // Fails before any adapter runs; no network involved.
        let config = AppConfig::default();
        let ctx = FetchContext::new(&config).unwrap();
        let opts = PipelineOptions {
            limit: 10,
            deep: false,
            translate: false,
        };
        let result = fetch_scenario(&config, &ctx, "sports", &opts).await;
        assert!(matches!(
            result,
            Err(ScenarioError::UnknownScenario(key)) if key == "sports"
        ));
    }
}
