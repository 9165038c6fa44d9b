// src/checker/testing.rs
// In-memory HttpProbe used by the unit tests. URLs it does not know about
// behave like a refused connection.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ProbeError;

use super::http::{FetchedPage, HttpProbe};

#[derive(Debug, Clone)]
pub struct FakeResponse {
    head: Result<u16, ProbeError>,
    get: Result<FetchedPage, ProbeError>,
    delay: Option<Duration>,
    fail_get_after: Option<usize>,
}

impl FakeResponse {
    pub fn ok(body: &str) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: &str) -> Self {
        Self {
            head: Ok(status),
            get: Ok(FetchedPage {
                status,
                final_url: String::new(),
                body: body.to_string(),
            }),
            delay: None,
            fail_get_after: None,
        }
    }

    pub fn with_head(mut self, head: Result<u16, ProbeError>) -> Self {
        self.head = head;
        self
    }

    pub fn with_get(mut self, get: Result<u16, ProbeError>) -> Self {
        self.get = match get {
            Ok(status) => self.get.map(|page| FetchedPage { status, ..page }),
            Err(e) => Err(e),
        };
        self
    }

    // GETs after the first `n` fail, as if the server went away
    pub fn fail_get_after(mut self, n: usize) -> Self {
        self.fail_get_after = Some(n);
        self
    }

    // GET ends up at `final_url`, as if the server redirected there
    pub fn redirected_to(mut self, final_url: &str) -> Self {
        if let Ok(page) = self.get.as_mut() {
            page.final_url = final_url.to_string();
        }
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Debug, Default)]
pub struct FakeSite {
    responses: HashMap<String, FakeResponse>,
    heads: Mutex<HashMap<String, usize>>,
    gets: Mutex<HashMap<String, usize>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, body: &str) -> Self {
        self.respond(url, FakeResponse::ok(body))
    }

    pub fn status(self, url: &str, status: u16) -> Self {
        self.respond(url, FakeResponse::with_status(status, ""))
    }

    pub fn respond(mut self, url: &str, mut response: FakeResponse) -> Self {
        if let Ok(page) = response.get.as_mut() {
            if page.final_url.is_empty() {
                page.final_url = url.to_string();
            }
        }
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn head_count(&self, url: &str) -> usize {
        count(&self.heads, url)
    }

    pub fn get_count(&self, url: &str) -> usize {
        count(&self.gets, url)
    }

    async fn lookup(&self, url: &str) -> Result<FakeResponse, ProbeError> {
        let response = self
            .responses
            .get(url)
            .cloned()
            .ok_or_else(|| ProbeError::Connect("connection refused".to_string()))?;

        if let Some(delay) = response.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(response)
    }
}

fn count(calls: &Mutex<HashMap<String, usize>>, url: &str) -> usize {
    calls.lock().unwrap().get(url).copied().unwrap_or(0)
}

fn record(calls: &Mutex<HashMap<String, usize>>, url: &str) {
    *calls.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;
}

#[async_trait]
impl HttpProbe for FakeSite {
    async fn head(&self, url: &str, _timeout: Duration) -> Result<u16, ProbeError> {
        record(&self.heads, url);
        self.lookup(url).await?.head
    }

    async fn get(&self, url: &str, _timeout: Duration) -> Result<FetchedPage, ProbeError> {
        record(&self.gets, url);
        let calls = self.get_count(url);
        let response = self.lookup(url).await?;
        if response.fail_get_after.is_some_and(|n| calls > n) {
            return Err(ProbeError::Connect("connection reset".to_string()));
        }
        response.get
    }
}
