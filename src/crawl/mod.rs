// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling starting from a seed URL
// - Configurable same-site rule (exact host, root domain, or suffix)
// - Every discovered link validated once, in bounded concurrent batches
// - Page, depth and time budgets so hostile sites cannot run forever
// - Progress reported through an observer, never printed directly
// =============================================================================

mod observer;
mod pool;
mod queue;
mod scope;

pub use observer::{ConsoleObserver, CrawlObserver, LogObserver, NoopObserver};
pub use pool::WorkerPool;
pub use queue::{crawl, normalize_seed, CrawlReport, SiteCrawler};
pub use scope::{in_scope, SiteScope};
