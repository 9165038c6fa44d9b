// src/crawl/queue.rs
// =============================================================================
// Breadth-first crawl with batched link validation.
//
// How it works:
// 1. Start with the seed in a FIFO queue (the frontier)
// 2. Pop a page and fetch its HTML
// 3. Extract same-site links that were never checked before
// 4. Validate that batch on the worker pool and wait for all of it
// 5. Valid links join the result set and the frontier; repeat
//
// All crawl state lives in CrawlState and is only touched by this loop,
// between batches. Validation tasks never see it.
//
// Failures never stop the crawl, with one exception: if the seed page itself
// cannot be fetched there is nothing to crawl, and crawl() returns
// CrawlError::SeedUnreachable.
// =============================================================================

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::checker::{
    extract_anchors, resolve_href, FetchedPage, HttpProbe, InvalidReason, KeywordFilter,
    LinkValidator, ReqwestProbe, Verdict,
};
use crate::config::CrawlConfig;
use crate::error::CrawlError;

use super::observer::{CrawlObserver, NoopObserver};
use super::pool::WorkerPool;
use super::scope::SiteScope;

/// What a finished crawl hands back.
///
/// Counting rules:
/// - `total_internal` counts every in-scope link occurrence, repeats included
/// - `invalid_count` counts failed validations plus pages that failed to fetch
/// - `failed_pages` is the page-fetch part of `invalid_count`; those failures
///   never add to `total_internal`
///
/// so `total_internal == (valid_links.len() - 1) + (invalid_count - failed_pages)
///  + filtered_links + duplicate_links`, the `- 1` being the seed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlReport {
    pub seed: String,
    /// Sorted; always contains the seed
    pub valid_links: Vec<String>,
    pub total_internal: usize,
    pub invalid_count: usize,
    pub failed_pages: usize,
    /// Link occurrences skipped because the URL was already checked
    pub duplicate_links: usize,
    /// Valid links dropped by the keyword filter
    pub filtered_links: usize,
    pub pages_fetched: usize,
    /// Size of the checked set, seed included
    pub links_checked: usize,
    /// True when a page or time budget stopped the crawl early
    pub truncated: bool,
}

#[derive(Debug, Clone)]
struct FrontierEntry {
    url: String,
    depth: usize,
}

// A link discovered on a page, waiting for validation
#[derive(Debug, Clone)]
struct Candidate {
    url: String,
    href: String,
    text: String,
    depth: usize,
}

// Owned exclusively by the crawl loop
#[derive(Debug, Default)]
struct CrawlState {
    frontier: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
    checked: HashSet<String>,
    valid: BTreeSet<String>,
    total_internal: usize,
    invalid_count: usize,
    failed_pages: usize,
    duplicate_links: usize,
    filtered_links: usize,
    pages_fetched: usize,
    truncated: bool,
}

impl CrawlState {
    fn new(seed: &str) -> Self {
        let mut state = Self::default();
        state.frontier.push_back(FrontierEntry {
            url: seed.to_string(),
            depth: 0,
        });
        // The seed is confirmed by fetching it first, never by validation
        state.checked.insert(seed.to_string());
        state.valid.insert(seed.to_string());
        state
    }

    fn pages_attempted(&self) -> usize {
        self.pages_fetched + self.failed_pages
    }

    fn record_page_failure(&mut self) {
        self.invalid_count += 1;
        self.failed_pages += 1;
    }

    // Redirect targets are the same page under another URL
    fn mark_alias(&mut self, url: &str, final_url: &str, scope: &SiteScope) {
        if url != final_url && scope.contains_str(final_url) {
            self.visited.insert(final_url.to_string());
            self.checked.insert(final_url.to_string());
        }
    }

    // Turns a fetched page into the next validation batch
    fn expand_links(
        &mut self,
        page: &FetchedPage,
        page_url: &str,
        depth: usize,
        scope: &SiteScope,
    ) -> Vec<Candidate> {
        let base = match Url::parse(&page.final_url).or_else(|_| Url::parse(page_url)) {
            Ok(base) => base,
            Err(_) => return Vec::new(),
        };

        let mut batch = Vec::new();
        for anchor in extract_anchors(&page.body) {
            let Some(url) = resolve_href(&base, &anchor.href) else {
                continue;
            };
            if !scope.contains_str(&url) {
                continue;
            }

            self.total_internal += 1;
            if !self.checked.insert(url.clone()) {
                self.duplicate_links += 1;
                continue;
            }

            batch.push(Candidate {
                url,
                href: anchor.href,
                text: anchor.text,
                depth: depth + 1,
            });
        }
        batch
    }

    // Folds a joined batch into the state. Returns (valid, invalid).
    fn apply_batch(
        &mut self,
        results: Vec<(Candidate, Verdict)>,
        keywords: &KeywordFilter,
        max_depth: Option<usize>,
    ) -> (usize, usize) {
        let mut valid = 0;
        let mut invalid = 0;

        for (candidate, verdict) in results {
            let body = match verdict {
                Verdict::Valid { body } => body,
                Verdict::Invalid(_) => {
                    self.invalid_count += 1;
                    invalid += 1;
                    continue;
                }
            };

            let wanted = !keywords.is_active()
                || keywords.matches_any([
                    candidate.text.as_str(),
                    candidate.href.as_str(),
                    body.as_str(),
                ]);

            if wanted {
                self.valid.insert(candidate.url.clone());
                valid += 1;
            } else {
                debug!(url = %candidate.url, "no keyword match, excluded");
                self.filtered_links += 1;
            }

            // Pages at the depth limit would be fetched for nothing
            let expandable = max_depth.map_or(true, |max| candidate.depth < max);
            if expandable && !self.visited.contains(&candidate.url) {
                self.frontier.push_back(FrontierEntry {
                    url: candidate.url,
                    depth: candidate.depth,
                });
            }
        }

        (valid, invalid)
    }

    fn into_report(self, seed: String) -> CrawlReport {
        CrawlReport {
            seed,
            valid_links: self.valid.into_iter().collect(),
            total_internal: self.total_internal,
            invalid_count: self.invalid_count,
            failed_pages: self.failed_pages,
            duplicate_links: self.duplicate_links,
            filtered_links: self.filtered_links,
            pages_fetched: self.pages_fetched,
            links_checked: self.checked.len(),
            truncated: self.truncated,
        }
    }
}

/// Crawls one site at a time with a shared HTTP probe.
pub struct SiteCrawler<P> {
    config: CrawlConfig,
    probe: P,
}

impl<P: HttpProbe> SiteCrawler<P> {
    pub fn new(config: CrawlConfig, probe: P) -> Self {
        Self { config, probe }
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub fn validator(&self) -> LinkValidator<'_, P> {
        LinkValidator::new(&self.probe, &self.config)
    }

    pub async fn crawl(
        &self,
        seed: &str,
        observer: &dyn CrawlObserver,
    ) -> Result<CrawlReport, CrawlError> {
        let seed_url = normalize_seed(seed)?;
        let scope = SiteScope::new(&seed_url, self.config.scope).ok_or_else(|| {
            CrawlError::InvalidSeed {
                url: seed.to_string(),
                reason: "URL has no host".to_string(),
            }
        })?;
        let seed = seed_url.to_string();

        let validator = self.validator();
        let keywords = KeywordFilter::new(&self.config.keywords);
        let pool = WorkerPool::new(self.config.workers);
        let deadline = self.config.time_budget().map(|budget| Instant::now() + budget);

        info!(%seed, host = scope.host(), scope = ?scope.policy(), workers = pool.workers(), "starting crawl");

        let mut state = CrawlState::new(&seed);

        while let Some(entry) = state.frontier.pop_front() {
            if state.pages_attempted() > 0 && self.budget_exhausted(&state, deadline) {
                warn!(%seed, pages = state.pages_attempted(), "crawl budget reached, stopping");
                state.truncated = true;
                break;
            }

            if !state.visited.insert(entry.url.clone()) {
                continue;
            }

            observer.page_started(&entry.url);
            let page = match self.fetch_page(&entry.url).await {
                Ok(page) => page,
                Err(reason) => {
                    observer.page_finished(&entry.url, false);
                    if entry.depth == 0 {
                        return Err(CrawlError::SeedUnreachable {
                            url: seed,
                            reason: reason.to_string(),
                        });
                    }
                    warn!(url = %entry.url, %reason, "failed to fetch page");
                    state.record_page_failure();
                    continue;
                }
            };
            observer.page_finished(&entry.url, true);
            state.pages_fetched += 1;
            state.mark_alias(&entry.url, &page.final_url, &scope);

            if self.config.max_depth.is_some_and(|max| entry.depth >= max) {
                continue;
            }

            let batch = state.expand_links(&page, &entry.url, entry.depth, &scope);
            if batch.is_empty() {
                continue;
            }

            observer.batch_started(batch.len());
            let validator = &validator;
            let results = pool
                .run_batch(
                    batch,
                    move |candidate: Candidate| async move {
                        let verdict = validator.validate(&candidate.url).await;
                        (candidate, verdict)
                    },
                    |result: &(Candidate, Verdict)| observer.link_checked(&result.0.url, &result.1),
                )
                .await;

            let (valid, invalid) = state.apply_batch(results, &keywords, self.config.max_depth);
            observer.batch_complete(valid, invalid);
        }

        let report = state.into_report(seed);
        observer.crawl_complete(&report);
        Ok(report)
    }

    fn budget_exhausted(&self, state: &CrawlState, deadline: Option<Instant>) -> bool {
        state.pages_attempted() >= self.config.max_pages
            || deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, InvalidReason> {
        match self.probe.get(url, self.config.timeout()).await {
            Ok(page) if page.is_error_status() => Err(InvalidReason::ErrorStatus(page.status)),
            Ok(page) => Ok(page),
            Err(e) => Err(InvalidReason::FetchFailed(e)),
        }
    }
}

/// Crawls `seed` with a fresh reqwest client and no progress output.
pub async fn crawl(seed: &str, config: &CrawlConfig) -> Result<CrawlReport, CrawlError> {
    let probe = ReqwestProbe::new(config)?;
    SiteCrawler::new(config.clone(), probe)
        .crawl(seed, &NoopObserver)
        .await
}

// Adds "http://" when the seed has no scheme, then checks it is a web URL
//
// Examples:
//   "example.com"          -> http://example.com/
//   "https://example.com/a" -> https://example.com/a
//   "ftp://example.com"    -> InvalidSeed
pub fn normalize_seed(seed: &str) -> Result<Url, CrawlError> {
    let invalid = |reason: String| CrawlError::InvalidSeed {
        url: seed.to_string(),
        reason,
    };

    let trimmed = seed.trim();
    if trimmed.is_empty() {
        return Err(invalid("empty URL".to_string()));
    }

    let with_scheme = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    let mut url = Url::parse(&with_scheme).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("URL has no host".to_string()));
    }

    url.set_fragment(None);
    Ok(url)
}

// True when the text before the first "://" is a scheme name. A "://" later
// on, inside a path or query, does not count.
fn has_scheme(seed: &str) -> bool {
    let Some((scheme, _)) = seed.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
