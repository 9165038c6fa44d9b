// src/config.rs
// =============================================================================
// Configuration for the crawl and render stages.
//
// Every field has a serde default so a JSON config file only needs to name
// the settings it changes:
//
//   { "workers": 20, "scope": "root-domain", "keywords": ["products"] }
//
// Command-line flags are applied on top of whatever the file provides.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Which hosts count as "the same site" as the seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ScopePolicy {
    /// Host and explicit port must equal the seed's
    #[default]
    Exact,
    /// Same registrable root domain, so subdomains are included
    RootDomain,
    /// Seed host itself or any host ending in ".<seed host>"
    Suffix,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Maximum number of link validations in flight at once
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Per-request timeout for every HEAD and GET
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    #[serde(default)]
    pub scope: ScopePolicy,

    /// Stop after fetching this many pages
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Pages at this depth (seed = 0) are not expanded any further
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Wall-clock budget for a whole crawl
    #[serde(default)]
    pub time_budget_secs: Option<u64>,

    /// When non-empty, only pages mentioning one of these are kept
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Body text that marks a 200 response as a soft-404
    #[serde(default = "default_soft_404_markers")]
    pub soft_404_markers: Vec<String>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
            scope: ScopePolicy::default(),
            max_pages: default_max_pages(),
            max_depth: None,
            time_budget_secs: None,
            keywords: Vec::new(),
            soft_404_markers: default_soft_404_markers(),
            user_agent: default_user_agent(),
        }
    }
}

impl CrawlConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_secs.map(Duration::from_secs)
    }

    /// Rejects settings that would make the crawl hang or do nothing.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            bail!("workers must be at least 1");
        }
        if self.timeout_secs == 0 {
            bail!("timeout must be at least 1 second");
        }
        if self.max_pages == 0 {
            bail!("max_pages must be at least 1");
        }
        Ok(())
    }
}

fn default_workers() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_max_redirects() -> usize {
    10
}

fn default_max_pages() -> usize {
    500
}

fn default_soft_404_markers() -> Vec<String> {
    vec!["not found".to_string()]
}

fn default_user_agent() -> String {
    format!("site2pdf/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Per-domain page folders and merged documents are written here
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_renderer_bin")]
    pub renderer_bin: String,

    #[serde(default = "default_merger_bin")]
    pub merger_bin: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            renderer_bin: default_renderer_bin(),
            merger_bin: default_merger_bin(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("pdfs")
}

fn default_renderer_bin() -> String {
    String::from("wkhtmltopdf")
}

fn default_merger_bin() -> String {
    String::from("pdfunite")
}

/// Both halves of the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(flatten)]
    pub crawl: CrawlConfig,

    #[serde(default)]
    pub render: RenderConfig,
}

impl FileConfig {
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}
