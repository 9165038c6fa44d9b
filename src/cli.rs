// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Every crawl/render setting is an Option here: None means "keep whatever
// the config file (or the built-in default) says".
// =============================================================================

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

use site2pdf::config::FileConfig;
use site2pdf::ScopePolicy;

#[derive(Parser, Debug)]
#[command(
    name = "site2pdf",
    version,
    about = "Crawl a website, validate its internal links and bundle the valid pages into one PDF",
    long_about = "site2pdf crawls each given domain breadth-first, checks every internal link \
                  (dropping 404s, errors and soft-404 pages), renders the surviving pages to PDF \
                  and merges them into a single document per domain."
)]
pub struct Cli {
    /// One or more domains or URLs to crawl (e.g. example.com)
    ///
    /// A missing scheme defaults to http://
    #[arg(required = true)]
    pub domains: Vec<String>,

    /// Only keep pages whose link text, URL or content mentions a keyword
    ///
    /// Repeat the flag or separate with commas: -k products,pricing
    #[arg(short, long = "keyword", value_delimiter = ',')]
    pub keywords: Vec<String>,

    /// Number of links validated concurrently
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Which hosts count as the same site
    #[arg(long, value_enum)]
    pub scope: Option<ScopePolicy>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Stop after fetching this many pages per domain
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Do not expand pages deeper than this (seed = 0)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Wall-clock budget per domain, in seconds
    #[arg(long)]
    pub time_budget: Option<u64>,

    /// Where per-page PDFs and merged documents are written
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Only crawl and report; do not render or merge PDFs
    #[arg(long)]
    pub crawl_only: bool,

    /// Output crawl reports in JSON format instead of progress lines
    #[arg(long)]
    pub json: bool,

    /// JSON config file; flags given on the command line take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level for diagnostics written to stderr
    #[arg(long, default_value = "warn")]
    pub log_level: Level,
}

impl Cli {
    // Layers command-line flags on top of the config file
    pub fn apply_to(&self, config: &mut FileConfig) {
        let crawl = &mut config.crawl;

        if !self.keywords.is_empty() {
            crawl.keywords = self.keywords.clone();
        }
        if let Some(workers) = self.workers {
            crawl.workers = workers;
        }
        if let Some(scope) = self.scope {
            crawl.scope = scope;
        }
        if let Some(timeout) = self.timeout {
            crawl.timeout_secs = timeout;
        }
        if let Some(max_pages) = self.max_pages {
            crawl.max_pages = max_pages;
        }
        if self.max_depth.is_some() {
            crawl.max_depth = self.max_depth;
        }
        if self.time_budget.is_some() {
            crawl.time_budget_secs = self.time_budget;
        }
        if let Some(output_dir) = &self.output_dir {
            config.render.output_dir = output_dir.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_a_domain() {
        assert!(Cli::try_parse_from(["site2pdf"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "site2pdf",
            "example.com",
            "docs.rs",
            "-k",
            "products,pricing",
            "--workers",
            "4",
            "--scope",
            "root-domain",
        ])
        .unwrap();
        assert_eq!(cli.domains, vec!["example.com", "docs.rs"]);

        let mut config = FileConfig::default();
        config.crawl.max_pages = 42;
        cli.apply_to(&mut config);

        assert_eq!(config.crawl.keywords, vec!["products", "pricing"]);
        assert_eq!(config.crawl.workers, 4);
        assert_eq!(config.crawl.scope, ScopePolicy::RootDomain);
        // untouched by the command line
        assert_eq!(config.crawl.max_pages, 42);
    }
}
