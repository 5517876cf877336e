use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Html,
    All,
}

/// Aggregate today's hot items and publish a static dashboard.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Maximum items kept per scenario after ranking
    #[arg(short, long, default_value_t = 10, env = "NEWS_LIMIT")]
    pub limit: usize,

    /// Fetch article pages to extract content and summaries
    #[arg(long, env = "DEEP_ENRICH")]
    pub deep: bool,

    /// Skip translating titles to Chinese
    #[arg(long, env = "NO_TRANSLATE")]
    pub no_translate: bool,

    /// Scenario to run, or "all" for the full dashboard
    #[arg(short, long, default_value = "all")]
    pub category: String,

    /// Which artifacts to write
    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    pub output: OutputFormat,

    /// Directory the dashboard and data files are written to
    #[arg(long, default_value = "docs", env = "OUTPUT_DIR")]
    pub output_dir: String,

    /// Fix the shuffle seed for reproducible social-post ordering
    #[arg(long, env = "SHUFFLE_SEED")]
    pub shuffle_seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["hotdash"]);
        assert_eq!(cli.limit, 10);
        assert!(!cli.deep);
        assert!(!cli.no_translate);
        assert_eq!(cli.category, "all");
        assert_eq!(cli.output, OutputFormat::Html);
        assert_eq!(cli.output_dir, "docs");
        assert_eq!(cli.shuffle_seed, None);
    }

    #[test]
    fn test_full_invocation() {
        let cli = Cli::parse_from([
            "hotdash",
            "--limit",
            "5",
            "--deep",
            "--no-translate",
            "--category",
            "ai",
            "--output",
            "all",
            "--output-dir",
            "out",
            "--shuffle-seed",
            "42",
        ]);
        assert_eq!(cli.limit, 5);
        assert!(cli.deep);
        assert!(cli.no_translate);
        assert_eq!(cli.category, "ai");
        assert_eq!(cli.output, OutputFormat::All);
        assert_eq!(cli.output_dir, "out");
        assert_eq!(cli.shuffle_seed, Some(42));
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::parse_from(["hotdash", "-l", "3", "-c", "github"]);
        assert_eq!(cli.limit, 3);
        assert_eq!(cli.category, "github");
    }
}
