//! # Hotdash
//!
//! A hot-items aggregation pipeline that pulls the day's trending content
//! from nine heterogeneous sources, filters and ranks it, and publishes a
//! static single-page dashboard.
//!
//! ## Features
//!
//! - Concurrent fetch-and-normalize across HTML boards, JSON APIs, and feeds
//!   (Hacker News, Weibo, GitHub Trending, 36Kr, V2EX, Tencent News,
//!   WallStreetCN, Product Hunt, and curated X accounts via Nitter mirrors)
//! - Keyword filtering, optional page enrichment, optional Chinese translation
//! - Heat-score ranking with tool/tutorial practicality tags
//! - Static HTML dashboard and JSON data files suitable for GitHub Pages
//!
//! ## Usage
//!
//! ```sh
//! hotdash --limit 10 --output all --output-dir docs
//! ```
//!
//! ## Architecture
//!
//! One run is a pipeline per scenario:
//! 1. **Fetch**: every configured source adapter runs concurrently (5 at a time)
//! 2. **Filter**: titles are narrowed by the scenario's keyword spec
//! 3. **Enrich/Translate**: optional page extraction and title translation
//! 4. **Rank**: heat-score ordering, practicality tagging, truncation
//! 5. **Publish**: HTML page, JSON data file, index/history refresh

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod enrich;
mod models;
mod notify;
mod outputs;
mod pipeline;
mod rank;
mod sources;
mod translate;
mod utils;

use cli::{Cli, OutputFormat};
use config::{AppConfig, DASHBOARD_ORDER};
use models::{Dashboard, Section};
use pipeline::{fetch_scenario, PipelineOptions};
use sources::FetchContext;
use utils::{beijing_today, build_summary, ensure_writable_dir};

/// The GitHub section stays short regardless of the global limit.
const GITHUB_LIMIT: usize = 2;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("hotdash starting up");

    let args = Cli::parse();
    debug!(?args.category, ?args.limit, ?args.output_dir, "Parsed CLI arguments");

    // Early check: ensure the output dir is writable before any network work.
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let config = AppConfig::default();
    let mut ctx = FetchContext::new(&config)?;
    ctx.shuffle_seed = args.shuffle_seed;

    let scenario_keys: Vec<&str> = if args.category == "all" {
        DASHBOARD_ORDER.to_vec()
    } else {
        vec![args.category.as_str()]
    };

    // ---- Run every scenario ----
    let mut sections = Vec::with_capacity(scenario_keys.len());
    for key in scenario_keys {
        let limit = if key == "github" {
            args.limit.min(GITHUB_LIMIT)
        } else {
            args.limit
        };
        let opts = PipelineOptions {
            limit,
            deep: args.deep,
            translate: !args.no_translate,
        };
        let items = fetch_scenario(&config, &ctx, key, &opts).await?;
        info!(scenario = %key, count = items.len(), "Scenario complete");
        sections.push(Section {
            key: key.to_string(),
            items,
        });
    }

    let dashboard = Dashboard {
        local_date: beijing_today(),
        summary: build_summary(&sections),
        sections,
    };
    info!(
        date = %dashboard.local_date,
        total = dashboard.total_items(),
        "All scenarios aggregated"
    );

    // ---- Publish ----
    if matches!(args.output, OutputFormat::Json | OutputFormat::All) {
        let path = outputs::json::write_dashboard(&dashboard, &args.output_dir).await?;
        info!(%path, "JSON data written");
    }
    if matches!(args.output, OutputFormat::Html | OutputFormat::All) {
        let path = outputs::html::write_dashboard(&dashboard, &config, &args.output_dir).await?;
        info!(%path, "Dashboard page written");
        if let Err(e) = outputs::html::update_index(&args.output_dir, &dashboard.local_date).await {
            warn!(error = %e, "Failed to refresh index/history pages");
        }
        notify::send_bark_notification(&ctx.client, &dashboard.local_date).await;
    }

    let elapsed = start_time.elapsed();
    info!(
        elapsed_secs = elapsed.as_secs_f64(),
        finished_at = %Local::now().to_rfc3339(),
        "hotdash run complete"
    );
    Ok(())
}
