//! Static HTML dashboard rendering.
//!
//! One self-contained page per day: a sticky quick-nav, per-scenario sections
//! in a fixed display order, items grouped by source, and an explicit
//! "no data" block for any scenario that yielded nothing. The index page
//! redirects to today's file and the history page lists prior days.

use crate::config::{source_info, AppConfig, RENDER_ORDER};
use crate::models::{Dashboard, Item, Section};
use crate::rank::{TOOL_MARK, TUTORIAL_MARK};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Write as _;
use tokio::fs;
use tracing::{info, instrument};

const SITE_TITLE: &str = "Hotdash";
const SITE_SUBTITLE: &str = "全网热点聚合";

const PAGE_CSS: &str = r#"
    body { font-family: system-ui, -apple-system, "PingFang SC", sans-serif;
           margin: 0; background: linear-gradient(135deg, #0A1929 0%, #1A3A52 100%);
           color: #E3F2FD; line-height: 1.6; }
    a { color: inherit; text-decoration: none; }
    .page { max-width: 1080px; margin: 0 auto; padding: 1.5rem; }
    .page-header { text-align: center; padding: 1rem 0; }
    .page-header h1 { margin: 0; color: #FFFFFF; }
    .page-header .date { color: #B0BEC5; }
    .quick-nav { display: flex; justify-content: center; gap: 1rem; flex-wrap: wrap;
                 position: sticky; top: 0; background: rgba(10, 25, 41, 0.95);
                 padding: 1rem; z-index: 100; border-bottom: 1px solid rgba(255,255,255,0.1); }
    .quick-nav-item { background: rgba(255,255,255,0.05); border: 1px solid rgba(255,255,255,0.1);
                      padding: 0.4rem 1rem; border-radius: 20px; font-size: 0.9rem; }
    .quick-nav-item:hover { background: #42A5F5; color: #fff; }
    .quick-nav-item .count { background: rgba(0,0,0,0.2); padding: 1px 6px;
                             border-radius: 8px; font-size: 0.75rem; margin-left: 0.4rem; }
    .daily-summary { background: rgba(255,255,255,0.05); border-radius: 12px;
                     padding: 1rem 1.5rem; margin: 1.5rem 0; }
    .scenario-section { margin: 2.5rem 0; }
    .scenario-header { display: flex; align-items: baseline; gap: 0.8rem;
                       border-bottom: 1px solid rgba(255,255,255,0.1); padding-bottom: 0.5rem; }
    .scenario-name { margin: 0; color: #FFFFFF; }
    .scenario-count, .scenario-desc { color: #B0BEC5; font-size: 0.85rem; }
    .category-header { display: flex; align-items: center; gap: 0.5rem; margin-top: 1.5rem; }
    .category-title { margin: 0; font-size: 1.05rem; color: #FFFFFF; }
    .category-count { color: #B0BEC5; font-size: 0.8rem; }
    .cards-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr));
                  gap: 1rem; margin-top: 0.8rem; }
    .card { background: rgba(255,255,255,0.05); border: 1px solid rgba(255,255,255,0.08);
            border-radius: 12px; padding: 1rem; }
    .card.is-hot { border-color: #FFA726; }
    .card.rank-gold { box-shadow: 0 0 0 1px #FFD54F inset; }
    .card-title { margin: 0 0 0.4rem; font-size: 1rem; color: #FFFFFF; }
    .card-title-link:hover .card-title { color: #42A5F5; }
    .card-summary { margin: 0.4rem 0; color: #B0BEC5; font-size: 0.85rem; }
    .card-meta { display: flex; gap: 1rem; color: #B0BEC5; font-size: 0.8rem; }
    .badge { display: inline-block; font-size: 0.7rem; border-radius: 6px;
             padding: 1px 6px; margin-right: 0.3rem; }
    .badge-tool { background: #2D1B3D; color: #B39DDB; }
    .badge-tutorial { background: #0D1F12; color: #66BB6A; }
    .empty-tab { color: #B0BEC5; padding: 2rem 0; text-align: center; }
    .empty-page { text-align: center; padding: 4rem 0; color: #B0BEC5; }
    .page-footer { text-align: center; color: #B0BEC5; font-size: 0.8rem;
                   padding: 2rem 0; }
"#;

/// Minimal HTML escaping for text interpolated into the page.
fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// "2026-01-22" -> "1月22日 周四". Unparseable dates pass through unchanged.
fn format_cn_date(date: &str) -> String {
    let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
        return date.to_string();
    };
    let weekdays = ["周一", "周二", "周三", "周四", "周五", "周六", "周日"];
    let weekday = weekdays[parsed.weekday().num_days_from_monday() as usize];
    format!("{}月{}日 {}", parsed.month(), parsed.day(), weekday)
}

fn is_hot(item: &Item) -> bool {
    let heat = item.heat.to_lowercase();
    if heat.contains('万') || heat.contains('w') || heat.contains('k') {
        return true;
    }
    let first_int = heat
        .split_whitespace()
        .next()
        .and_then(|tok| tok.parse::<u64>().ok());
    match first_int {
        Some(n) if heat.contains("points") => n >= 200,
        Some(n) if heat.contains("repl") => n >= 50,
        _ => false,
    }
}

fn card_html(item: &Item) -> String {
    // Practicality markers become badges; the displayed title drops them.
    let mut badges = String::new();
    let mut title = item.title.clone();
    if title.contains(TOOL_MARK) {
        badges.push_str(r#"<span class="badge badge-tool">Tool</span>"#);
        title = title.replace(TOOL_MARK, "").trim().to_string();
    }
    if title.contains(TUTORIAL_MARK) {
        badges.push_str(r#"<span class="badge badge-tutorial">Tutorial</span>"#);
        title = title.replace(TUTORIAL_MARK, "").trim().to_string();
    }

    let mut meta = String::new();
    if !item.time.is_empty() {
        let _ = write!(meta, r#"<span class="meta-item">🕒 {}</span>"#, escape(&item.time));
    }
    if !item.heat.is_empty() {
        let _ = write!(meta, r#"<span class="meta-item">🔥 {}</span>"#, escape(&item.heat));
    }

    let summary = item
        .summary
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| format!(r#"<p class="card-summary">{}</p>"#, escape(s)))
        .unwrap_or_default();

    let hot_class = if is_hot(item) { " is-hot" } else { "" };
    let rank_class = if item.heat_score.unwrap_or(0.0) > 1000.0 {
        " rank-gold"
    } else {
        ""
    };
    let href = if item.url.is_empty() { "#" } else { &item.url };

    format!(
        r#"<div class="card{hot_class}{rank_class}">
  <div class="card-content">
    <a href="{href}" target="_blank" class="card-title-link"><h3 class="card-title">{title}</h3></a>
    <div class="badges">{badges}</div>
    {summary}
    <div class="card-meta">{meta}</div>
  </div>
</div>"#,
        href = escape(href),
        title = escape(&title),
    )
}

fn section_html(section: &Section) -> String {
    if section.items.is_empty() {
        return r#"<div class="empty-tab">暂无内容，请稍候再试。</div>"#.to_string();
    }

    // Group by source; BTreeMap gives a deterministic source order.
    let mut by_source: BTreeMap<&str, Vec<&Item>> = BTreeMap::new();
    for item in &section.items {
        by_source.entry(item.source.as_str()).or_default().push(item);
    }

    let mut html = String::new();
    for (source, items) in by_source {
        let icon = source_info(source).icon;
        let _ = write!(
            html,
            r#"<div class="category-section">
  <div class="category-header">
    <span class="category-icon">{icon}</span>
    <h2 class="category-title">{source}</h2>
    <span class="category-count">{count}</span>
  </div>
  <div class="cards-grid">"#,
            source = escape(source),
            count = items.len(),
        );
        for item in items {
            html.push_str(&card_html(item));
        }
        html.push_str("</div></div>");
    }
    html
}

/// Sections in display order: the fixed render order first, then anything
/// else (e.g. a single-category run) in fetch order.
fn ordered_sections(dashboard: &Dashboard) -> Vec<&Section> {
    let mut ordered: Vec<&Section> = RENDER_ORDER
        .iter()
        .filter_map(|key| dashboard.sections.iter().find(|s| s.key == *key))
        .collect();
    for section in &dashboard.sections {
        if !RENDER_ORDER.contains(&section.key.as_str()) {
            ordered.push(section);
        }
    }
    ordered
}

/// Render the full dashboard page.
pub fn render_dashboard(dashboard: &Dashboard, config: &AppConfig) -> String {
    let sections = ordered_sections(dashboard);

    let mut nav = String::new();
    let mut body = String::new();
    for section in &sections {
        let (name, description) = config
            .scenario(&section.key)
            .map(|s| (s.name.clone(), s.description.clone()))
            .unwrap_or_else(|| (section.key.clone(), String::new()));

        let _ = write!(
            nav,
            r##"<a class="quick-nav-item" href="#{key}">{name}<span class="count">{count}</span></a>"##,
            key = escape(&section.key),
            name = escape(&name),
            count = section.items.len(),
        );
        let _ = write!(
            body,
            r#"<section class="scenario-section" id="{key}">
  <div class="scenario-header">
    <h2 class="scenario-name">{name}</h2>
    <span class="scenario-count">{count} 条</span>
    <span class="scenario-desc">{description}</span>
  </div>
  {content}
</section>"#,
            key = escape(&section.key),
            name = escape(&name),
            count = section.items.len(),
            description = escape(&description),
            content = section_html(section),
        );
    }

    if dashboard.total_items() == 0 {
        body = r#"<div class="empty-page"><h2>今日暂无资讯</h2><p>所有信息源都没有返回内容，请稍后再试。</p></div>"#
            .to_string();
    }

    // The summary blurb carries its own trusted markup (<strong>, <br>).
    let summary = dashboard
        .summary
        .as_deref()
        .map(|s| format!(r#"<div class="daily-summary"><span>💡</span> {s}</div>"#))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{date} {SITE_SUBTITLE} - {SITE_TITLE}</title>
<style>{PAGE_CSS}</style>
</head>
<body>
<nav class="quick-nav">{nav}</nav>
<div class="page">
<header class="page-header"><h1>{SITE_TITLE}</h1><p class="date">{cn_date}</p></header>
{summary}
{body}
<footer class="page-footer"><a href="history.html">📚 历史归档</a></footer>
</div>
</body>
</html>"#,
        date = escape(&dashboard.local_date),
        cn_date = format_cn_date(&dashboard.local_date),
    )
}

fn index_html(date: &str) -> String {
    let today_file = format!("{date}.html");
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<meta http-equiv="refresh" content="0; url={today_file}">
<title>{SITE_TITLE}</title>
<script>window.location.href = "{today_file}";</script>
</head>
<body><p>正在跳转到今日页面... <a href="{today_file}">点击这里</a></p></body>
</html>"#
    )
}

fn history_html(mut dates: Vec<String>) -> String {
    dates.sort();
    dates.reverse();
    let links: String = dates
        .iter()
        .map(|d| format!(r#"<li><a href="{d}.html">{d}</a></li>"#))
        .collect();
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>History - {SITE_TITLE}</title>
<style>
  body {{ font-family: system-ui, sans-serif; max-width: 800px; margin: 0 auto;
         padding: 2rem; background: #f5f5f5; }}
  ul {{ list-style: none; padding: 0; }}
  li {{ background: white; margin-bottom: 1rem; padding: 1rem; border-radius: 8px; }}
  a {{ text-decoration: none; color: #0066cc; font-weight: 500; }}
</style>
</head>
<body>
<a href="index.html">← 返回今日页面</a>
<h1>📚 历史归档</h1>
<ul>{links}</ul>
</body>
</html>"#
    )
}

/// Write the daily page to `{output_dir}/{date}.html` and return the path.
#[instrument(level = "info", skip_all, fields(date = %dashboard.local_date))]
pub async fn write_dashboard(
    dashboard: &Dashboard,
    config: &AppConfig,
    output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let html = render_dashboard(dashboard, config);
    let path = format!("{}/{}.html", output_dir.trim_end_matches('/'), dashboard.local_date);
    fs::write(&path, html).await?;
    info!(%path, items = dashboard.total_items(), "Wrote dashboard page");
    Ok(path)
}

/// Rewrite `index.html` to redirect to the given date and regenerate
/// `history.html` from the daily files present in the output directory.
#[instrument(level = "info", skip_all, fields(%output_dir, %date))]
pub async fn update_index(output_dir: &str, date: &str) -> Result<(), Box<dyn Error>> {
    let dir = output_dir.trim_end_matches('/');
    fs::write(format!("{dir}/index.html"), index_html(date)).await?;

    let mut dates = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(stem) = name.strip_suffix(".html") {
            if stem != "index" && stem != "history" {
                dates.push(stem.to_string());
            }
        }
    }
    fs::write(format!("{dir}/history.html"), history_html(dates)).await?;
    info!("Updated index and history pages");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashboard_with(items: Vec<Item>) -> Dashboard {
        Dashboard {
            local_date: "2026-01-22".to_string(),
            summary: Some("今日共追踪到 <strong>1</strong> 条".to_string()),
            sections: vec![Section {
                key: "ai".to_string(),
                items,
            }],
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<b>"x" & y</b>"#), "&lt;b&gt;&quot;x&quot; &amp; y&lt;/b&gt;");
    }

    #[test]
    fn test_format_cn_date() {
        assert_eq!(format_cn_date("2026-01-22"), "1月22日 周四");
        assert_eq!(format_cn_date("not-a-date"), "not-a-date");
    }

    #[test]
    fn test_is_hot() {
        assert!(is_hot(&Item::new("S", "t", "", "3.5万", "")));
        assert!(is_hot(&Item::new("S", "t", "", "250 points", "")));
        assert!(!is_hot(&Item::new("S", "t", "", "10 points", "")));
        assert!(is_hot(&Item::new("S", "t", "", "80 replies", "")));
        assert!(!is_hot(&Item::new("S", "t", "", "", "")));
    }

    #[test]
    fn test_card_turns_markers_into_badges() {
        let mut item = Item::new("S", "🛠️ 📖 A guide", "https://e.com", "", "");
        item.heat_score = Some(0.0);
        let html = card_html(&item);
        assert!(html.contains("badge-tool"));
        assert!(html.contains("badge-tutorial"));
        assert!(!html.contains("🛠️"));
        assert!(html.contains("A guide"));
    }

    #[test]
    fn test_card_escapes_title() {
        let item = Item::new("S", "<script>alert(1)</script>", "https://e.com", "", "");
        let html = card_html(&item);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_dashboard_includes_sections_and_summary() {
        let config = AppConfig::default();
        let dashboard = dashboard_with(vec![Item::new(
            "Hacker News",
            "Story",
            "https://e.com",
            "300 points",
            "1 hour ago",
        )]);
        let html = render_dashboard(&dashboard, &config);
        assert!(html.contains("AI 热点"));
        assert!(html.contains("Story"));
        assert!(html.contains("daily-summary"));
        assert!(html.contains("history.html"));
    }

    #[test]
    fn test_render_dashboard_empty_run_shows_no_data_state() {
        let config = AppConfig::default();
        let mut dashboard = dashboard_with(vec![]);
        dashboard.summary = None;
        let html = render_dashboard(&dashboard, &config);
        assert!(html.contains("今日暂无资讯"));
    }

    #[test]
    fn test_index_redirects_to_date() {
        let html = index_html("2026-01-22");
        assert!(html.contains("url=2026-01-22.html"));
    }

    #[test]
    fn test_history_sorted_descending() {
        let html = history_html(vec!["2026-01-20".into(), "2026-01-22".into(), "2026-01-21".into()]);
        let first = html.find("2026-01-22").unwrap();
        let last = html.find("2026-01-20").unwrap();
        assert!(first < last);
    }
}
