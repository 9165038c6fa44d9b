// src/lib.rs
// =============================================================================
// The crawl engine behind the site2pdf binary.
//
// Layout:
// - config:  CrawlConfig / RenderConfig and the ScopePolicy choice
// - error:   typed errors for the crawl engine
// - checker: HTTP probing, anchor extraction, link validation, keywords
// - crawl:   scope filter, worker pool, BFS coordinator, progress observers
// - render:  page -> PDF rendering and per-domain merging
// =============================================================================

pub mod checker;
pub mod config;
pub mod crawl;
pub mod error;
pub mod render;

pub use config::{CrawlConfig, RenderConfig, ScopePolicy};
pub use crawl::{crawl, normalize_seed, CrawlReport, SiteCrawler};
pub use error::{CrawlError, ProbeError};
