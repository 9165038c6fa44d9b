// src/checker/http.rs
// =============================================================================
// The HTTP capability the crawler is built on.
//
// Two operations, both following redirects:
// - head(url, timeout): lightweight existence probe, status code only
// - get(url, timeout):  full fetch, status + final URL + body text
//
// The crawler and validator only see the HttpProbe trait. ReqwestProbe is the
// real implementation; tests swap in an in-memory site instead.
//
// Rust concepts:
// - Traits: define the behaviour the crawler needs, not the concrete client
// - async-trait: lets trait methods be async
// - Clone on reqwest::Client: cheap, shares one connection pool
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{redirect, Client};

use crate::config::CrawlConfig;
use crate::error::ProbeError;

/// A successful GET, whatever its status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    /// URL after following redirects; relative links resolve against this
    pub final_url: String,
    pub body: String,
}

impl FetchedPage {
    pub fn is_error_status(&self) -> bool {
        is_error_status(self.status)
    }
}

// 4xx and 5xx
pub fn is_error_status(status: u16) -> bool {
    status >= 400
}

#[async_trait]
pub trait HttpProbe: Send + Sync {
    /// HEAD-style existence check. Returns the final status code.
    async fn head(&self, url: &str, timeout: Duration) -> Result<u16, ProbeError>;

    /// GET-style full fetch.
    async fn get(&self, url: &str, timeout: Duration) -> Result<FetchedPage, ProbeError>;
}

// Shared, read-only HTTP client.
//
// One Client = one connection pool. Every worker borrows the same probe, so
// connections to the crawled site get reused across validations.
#[derive(Debug, Clone)]
pub struct ReqwestProbe {
    client: Client,
}

impl ReqwestProbe {
    pub fn new(config: &CrawlConfig) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .redirect(redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpProbe for ReqwestProbe {
    async fn head(&self, url: &str, timeout: Duration) -> Result<u16, ProbeError> {
        let response = self.client.head(url).timeout(timeout).send().await?;
        Ok(response.status().as_u16())
    }

    async fn get(&self, url: &str, timeout: Duration) -> Result<FetchedPage, ProbeError> {
        let response = self.client.get(url).timeout(timeout).send().await?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.text().await?;

        Ok(FetchedPage {
            status,
            final_url,
            body,
        })
    }
}
