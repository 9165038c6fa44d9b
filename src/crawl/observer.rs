// src/crawl/observer.rs
// =============================================================================
// Progress reporting for a crawl.
//
// The crawler calls these hooks as things happen; observers only watch.
// They never get mutable access to crawl state, and each hook should return
// quickly because the crawl waits for it.
//
// Implementations:
// - NoopObserver:    ignores everything (tests, library use)
// - LogObserver:     turns events into tracing records
// - ConsoleObserver: the interactive progress lines the CLI prints
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, info};

use crate::checker::Verdict;

use super::CrawlReport;

pub trait CrawlObserver {
    fn page_started(&self, _url: &str) {}

    fn page_finished(&self, _url: &str, _ok: bool) {}

    fn batch_started(&self, _size: usize) {}

    fn link_checked(&self, _url: &str, _verdict: &Verdict) {}

    fn batch_complete(&self, _valid: usize, _invalid: usize) {}

    fn crawl_complete(&self, _report: &CrawlReport) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CrawlObserver for NoopObserver {}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl CrawlObserver for LogObserver {
    fn page_started(&self, url: &str) {
        debug!(%url, "fetching page");
    }

    fn page_finished(&self, url: &str, ok: bool) {
        debug!(%url, ok, "page fetched");
    }

    fn batch_started(&self, size: usize) {
        debug!(size, "validating batch");
    }

    fn link_checked(&self, url: &str, verdict: &Verdict) {
        match verdict {
            Verdict::Valid { .. } => debug!(%url, "link valid"),
            Verdict::Invalid(reason) => debug!(%url, %reason, "link invalid"),
        }
    }

    fn batch_complete(&self, valid: usize, invalid: usize) {
        debug!(valid, invalid, "batch complete");
    }

    fn crawl_complete(&self, report: &CrawlReport) {
        info!(
            seed = %report.seed,
            valid = report.valid_links.len(),
            total_internal = report.total_internal,
            invalid = report.invalid_count,
            pages = report.pages_fetched,
            "crawl complete"
        );
    }
}

// Prints one line per checked link plus a running page counter.
#[derive(Debug, Default)]
pub struct ConsoleObserver {
    pages: AtomicUsize,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_page(&self) -> usize {
        self.pages.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl CrawlObserver for ConsoleObserver {
    fn page_started(&self, url: &str) {
        let n = self.next_page();
        println!("  Crawling [page {}]: {}", n, url);
    }

    fn page_finished(&self, url: &str, ok: bool) {
        if !ok {
            println!("  ⚠️  Could not fetch {}", url);
        }
    }

    fn batch_started(&self, size: usize) {
        println!("  🌐 Checking {} new link(s)...", size);
    }

    fn link_checked(&self, url: &str, verdict: &Verdict) {
        match verdict {
            Verdict::Valid { .. } => println!("     ✅ {}", url),
            Verdict::Invalid(reason) => println!("     ❌ {} ({})", url, reason),
        }
    }

    fn crawl_complete(&self, report: &CrawlReport) {
        // Page numbers restart for the next domain
        self.pages.store(0, Ordering::Relaxed);
        println!();
        println!("📊 Summary for {}:", report.seed);
        println!("   ✅ Valid pages: {}", report.valid_links.len());
        println!("   🔗 Internal links seen: {}", report.total_internal);
        println!("   ❌ Invalid: {}", report.invalid_count);
        println!("   📄 Pages crawled: {}", report.pages_fetched);
        if report.truncated {
            println!("   ⏹️  Stopped early: crawl budget reached");
        }
    }
}
