// src/checker/validator.rs
// =============================================================================
// Decides whether a single URL is a real, live page.
//
// Two steps:
// 1. HEAD probe (cheap). A 4xx/5xx answer rejects the URL right away.
//    If the probe cannot complete, or the server says it does not support
//    HEAD (405/501), the result is inconclusive and we move on to step 2.
// 2. GET fetch (authoritative). Transport errors, timeouts and error statuses
//    make the URL invalid. So does a "soft-404": a success status whose body
//    still says the page was not found.
//
// The first step may only say "no" or "try harder". Only the second step can
// say "yes", so anything ambiguous at the end counts as invalid.
// =============================================================================

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::config::CrawlConfig;
use crate::error::ProbeError;

use super::http::{is_error_status, HttpProbe};

/// What the HEAD probe tells us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Error status; the URL is invalid without a full fetch
    Rejected(u16),
    /// No usable answer; fall back to the full fetch
    Inconclusive,
    /// Non-error status; the full fetch still decides
    Passed(u16),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    ErrorStatus(u16),
    FetchFailed(ProbeError),
    SoftNotFound,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::ErrorStatus(status) => write!(f, "HTTP {status}"),
            InvalidReason::FetchFailed(e) => write!(f, "{e}"),
            InvalidReason::SoftNotFound => f.write_str("soft-404"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Carries the fetched body so callers can run keyword filters on it
    Valid { body: String },
    Invalid(InvalidReason),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid { .. })
    }
}

pub struct LinkValidator<'a, P: ?Sized> {
    probe: &'a P,
    timeout: Duration,
    // Lowercased soft-404 markers
    markers: Vec<String>,
}

impl<'a, P: HttpProbe + ?Sized> LinkValidator<'a, P> {
    pub fn new(probe: &'a P, config: &CrawlConfig) -> Self {
        Self {
            probe,
            timeout: config.timeout(),
            markers: config
                .soft_404_markers
                .iter()
                .map(|m| m.to_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    pub async fn validate(&self, url: &str) -> Verdict {
        let outcome = self.existence_probe(url).await;
        if let ProbeOutcome::Rejected(status) = outcome {
            return Verdict::Invalid(InvalidReason::ErrorStatus(status));
        }

        self.full_fetch(url).await
    }

    pub async fn existence_probe(&self, url: &str) -> ProbeOutcome {
        match self.probe.head(url, self.timeout).await {
            // Server does not implement HEAD for this resource
            Ok(405) | Ok(501) => ProbeOutcome::Inconclusive,
            Ok(status) if is_error_status(status) => ProbeOutcome::Rejected(status),
            Ok(status) => ProbeOutcome::Passed(status),
            Err(e) => {
                debug!(%url, error = %e, "HEAD probe inconclusive, falling back to GET");
                ProbeOutcome::Inconclusive
            }
        }
    }

    async fn full_fetch(&self, url: &str) -> Verdict {
        let page = match self.probe.get(url, self.timeout).await {
            Ok(page) => page,
            Err(e) => return Verdict::Invalid(InvalidReason::FetchFailed(e)),
        };

        if page.is_error_status() {
            return Verdict::Invalid(InvalidReason::ErrorStatus(page.status));
        }

        if self.is_soft_404(&page.body) {
            return Verdict::Invalid(InvalidReason::SoftNotFound);
        }

        Verdict::Valid { body: page.body }
    }

    fn is_soft_404(&self, body: &str) -> bool {
        let body = body.to_lowercase();
        self.markers.iter().any(|m| body.contains(m.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::testing::{FakeResponse, FakeSite};

    fn validator(site: &FakeSite) -> LinkValidator<'_, FakeSite> {
        LinkValidator::new(site, &CrawlConfig::default())
    }

    #[tokio::test]
    async fn test_ok_page_is_valid_and_keeps_body() {
        let site = FakeSite::new().page("http://a.test/", "<p>hello</p>");
        let verdict = validator(&site).validate("http://a.test/").await;
        assert_eq!(
            verdict,
            Verdict::Valid {
                body: "<p>hello</p>".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_head_error_status_rejects_without_get() {
        let site = FakeSite::new().status("http://a.test/gone", 410);
        let verdict = validator(&site).validate("http://a.test/gone").await;
        assert_eq!(verdict, Verdict::Invalid(InvalidReason::ErrorStatus(410)));
        assert_eq!(site.get_count("http://a.test/gone"), 0);
    }

    #[tokio::test]
    async fn test_head_failure_falls_back_to_get() {
        let site = FakeSite::new().respond(
            "http://a.test/",
            FakeResponse::ok("welcome").with_head(Err(ProbeError::Timeout)),
        );
        let verdict = validator(&site).validate("http://a.test/").await;
        assert!(verdict.is_valid());
        assert_eq!(site.get_count("http://a.test/"), 1);
    }

    #[tokio::test]
    async fn test_head_not_allowed_falls_back_to_get() {
        let site = FakeSite::new().respond(
            "http://a.test/",
            FakeResponse::ok("welcome").with_head(Ok(405)),
        );
        let v = validator(&site);
        assert_eq!(v.existence_probe("http://a.test/").await, ProbeOutcome::Inconclusive);
        assert!(v.validate("http://a.test/").await.is_valid());
    }

    #[tokio::test]
    async fn test_get_failure_is_invalid() {
        let site = FakeSite::new().respond(
            "http://a.test/",
            FakeResponse::ok("").with_get(Err(ProbeError::Timeout)),
        );
        let verdict = validator(&site).validate("http://a.test/").await;
        assert_eq!(
            verdict,
            Verdict::Invalid(InvalidReason::FetchFailed(ProbeError::Timeout))
        );
    }

    #[tokio::test]
    async fn test_soft_404_is_invalid() {
        let site = FakeSite::new().page("http://a.test/x", "<h1>Page Not Found</h1>");
        let verdict = validator(&site).validate("http://a.test/x").await;
        assert_eq!(verdict, Verdict::Invalid(InvalidReason::SoftNotFound));
    }

    #[tokio::test]
    async fn test_unknown_host_is_invalid() {
        let site = FakeSite::new();
        assert!(!validator(&site).validate("http://nowhere.test/").await.is_valid());
    }

    #[tokio::test]
    async fn test_validation_is_idempotent() {
        let site = FakeSite::new()
            .page("http://a.test/ok", "fine")
            .page("http://a.test/soft", "not found");
        let v = validator(&site);
        for url in ["http://a.test/ok", "http://a.test/soft", "http://a.test/missing"] {
            let first = v.validate(url).await.is_valid();
            let second = v.validate(url).await.is_valid();
            assert_eq!(first, second, "{url}");
        }
    }
}
