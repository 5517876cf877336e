//! Static configuration: scenario definitions, curated X accounts, Nitter
//! mirrors, and per-source display metadata.
//!
//! Everything here is built once at startup and injected into the orchestrator
//! as immutable data. Nothing in the pipeline reads module-level mutable state,
//! so tests can run against fixture configurations.

use serde::{Deserialize, Serialize};

/// A named grouping of sources, keyword filter and result limit, presented
/// as one dashboard section. Read-only in the pipeline.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Scenario {
    /// Stable key used on the command line and as the HTML anchor.
    pub key: String,
    /// Display name shown as the section heading.
    pub name: String,
    /// One-line description shown next to the heading.
    pub description: String,
    /// Adapter keys to run, or the single sentinel `"all"`.
    pub sources: Vec<String>,
    /// Keywords joined into the comma-separated filter spec; empty means
    /// no filtering.
    pub keywords: Vec<String>,
}

impl Scenario {
    /// The comma-separated keyword spec handed to each adapter, or `None`
    /// when the scenario does not filter.
    pub fn keyword_spec(&self) -> Option<String> {
        if self.keywords.is_empty() {
            None
        } else {
            Some(self.keywords.join(","))
        }
    }
}

/// Top-level configuration injected into the orchestrator.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub scenarios: Vec<Scenario>,
    /// Curated `(handle, category)` pairs for the X adapter.
    pub x_accounts: Vec<(String, String)>,
    /// Public Nitter mirrors to rotate through.
    pub nitter_instances: Vec<String>,
}

impl AppConfig {
    pub fn scenario(&self, key: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.key == key)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scenarios: default_scenarios(),
            x_accounts: curated_x_accounts(),
            nitter_instances: nitter_instances(),
        }
    }
}

fn scenario(
    key: &str,
    name: &str,
    description: &str,
    sources: &[&str],
    keywords: &[&str],
) -> Scenario {
    Scenario {
        key: key.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        sources: sources.iter().map(|s| s.to_string()).collect(),
        keywords: keywords.iter().map(|s| s.to_string()).collect(),
    }
}

/// The built-in scenario table.
pub fn default_scenarios() -> Vec<Scenario> {
    vec![
        scenario(
            "ai",
            "🔥 AI 热点",
            "硅谷前沿：Hacker News + Product Hunt",
            &["hackernews", "producthunt"],
            &["AI", "LLM", "GPT", "Claude", "Model", "RAG", "Agent", "Generative"],
        ),
        // These sources are already tech/business focused, no filtering.
        scenario(
            "china",
            "🇨🇳 科技",
            "国内大厂与创投：36Kr + 腾讯新闻",
            &["36kr", "tencent"],
            &[],
        ),
        scenario(
            "x_social",
            "🐦 X 精选",
            "精选账号最新动态",
            &["x_social"],
            &[],
        ),
        scenario(
            "github",
            "🐙 开源精选",
            "GitHub Trending 热门项目",
            &["github"],
            &[],
        ),
        scenario(
            "global",
            "🌐 全网扫描",
            "全网关键词扫描 (Agent + LLM)",
            &["all"],
            &["Agent", "LLM", "RAG", "AI", "Startup", "SaaS", "Open Source"],
        ),
    ]
}

/// Dashboard fetch order when running all scenarios.
pub const DASHBOARD_ORDER: [&str; 5] = ["china", "ai", "x_social", "github", "global"];

/// Section display order on the rendered page (domestic tech first).
pub const RENDER_ORDER: [&str; 5] = ["china", "x_social", "ai", "github", "global"];

/// Curated X (Twitter) accounts as `(handle, category)` pairs.
pub fn curated_x_accounts() -> Vec<(String, String)> {
    [
        // Core AI & tech
        ("DrJimFan", "AI Research"),
        ("karpathy", "AI Education"),
        ("_akhaliq", "AI Papers"),
        ("OfficialLoganK", "DevRel"),
        ("rowancheung", "AI News"),
        ("bentossell", "AI Startups"),
        ("imxiaohu", "Indie Dev"),
        ("real_kai42", "Indie Dev"),
        ("Jackywine", "AI Product"),
        ("johnrushx", "Indie Startups"),
        ("oran_ge", "AI Observer"),
        ("antfu7", "Open Source"),
        ("AlchainHust", "AI Education"),
        // Tech leaders
        ("sama", "OpenAI"),
        ("ylecun", "Meta AI"),
        ("elonmusk", "Tech Visionary"),
        ("levie", "SaaS"),
        ("natfriedman", "AI Investor"),
        ("OpenAI", "AI Lab"),
        // VC & startups
        ("paulg", "Startup Phil"),
        ("pmarca", "VC"),
        ("reidhoffman", "LinkedIn Founder"),
        ("eladgil", "Angel Investor"),
        ("balajis", "Future Tech"),
        ("IndieHackers", "Startup Comm"),
        // Dev & multi-field
        ("lxfater", "Product"),
        ("tualatrix", "Indie Dev"),
        ("PandaTalk8", "Dev Comm"),
    ]
    .iter()
    .map(|(h, c)| (h.to_string(), c.to_string()))
    .collect()
}

/// Public Nitter mirrors, tried in randomized order per handle.
pub fn nitter_instances() -> Vec<String> {
    [
        "nitter.projectsegfau.lt",
        "nitter.uni-sonia.com",
        "nitter.net",
        "nitter.privacydev.net",
        "nitter.lucabased.xyz",
        "nitter.manasiewicz.pl",
        "nitter.stderr.at",
        "nitter.poast.org",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Display metadata for a source, used by the HTML renderer.
#[derive(Debug, Clone, Copy)]
pub struct SourceInfo {
    pub icon: &'static str,
}

/// Map a source display name to its icon. Unknown sources get a newspaper.
pub fn source_info(source: &str) -> SourceInfo {
    let icon = match source {
        "Hacker News" => "🔶",
        "Product Hunt" => "🚀",
        "GitHub Trending" => "🐙",
        "V2EX" => "💬",
        "36Kr" => "📰",
        "Tencent News" => "🐧",
        "Weibo Hot Search" => "🔥",
        "Wall Street CN" => "💹",
        "X (Twitter)" => "🐦",
        _ => "📄",
    };
    SourceInfo { icon }
}
