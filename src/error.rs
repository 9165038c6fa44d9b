// src/error.rs
// =============================================================================
// Error types for the crawl engine.
//
// Only two things are ever surfaced to a caller of crawl():
// - the seed could not be parsed (InvalidSeed)
// - the seed page could not be fetched (SeedUnreachable)
//
// Everything that goes wrong with an individual link or page is absorbed
// into the crawl counters instead of becoming an error.
// =============================================================================

use thiserror::Error;

/// Why a single HEAD/GET request did not produce a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("request timed out")]
    Timeout,
    #[error("too many redirects")]
    TooManyRedirects,
    #[error("could not resolve hostname")]
    Dns,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for ProbeError {
    // Sorts reqwest failures into the same buckets a link checker reports
    fn from(error: reqwest::Error) -> Self {
        let error_string = error.to_string();

        if error.is_timeout() {
            ProbeError::Timeout
        } else if error.is_redirect() {
            ProbeError::TooManyRedirects
        } else if error.is_connect() {
            if error_string.contains("dns") {
                ProbeError::Dns
            } else {
                ProbeError::Connect(error_string)
            }
        } else {
            ProbeError::Other(error_string)
        }
    }
}

/// Fatal, per-seed crawl failures.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid seed URL '{url}': {reason}")]
    InvalidSeed { url: String, reason: String },

    #[error("seed {url} is unreachable: {reason}")]
    SeedUnreachable { url: String, reason: String },

    #[error("could not build HTTP client: {0}")]
    Client(#[from] ProbeError),
}
