// src/crawl/scope.rs
// =============================================================================
// Decides whether a URL belongs to the same site as the seed.
//
// The rule is picked with ScopePolicy:
// - Exact:      same host, same explicit port ("example.com" only);
//               http and https on default ports count as the same site
// - RootDomain: same registrable domain ("blog.example.com" is in scope)
// - Suffix:     the seed host or any subdomain of it
//
// Pure functions, no I/O. The input is already absolute; nothing here
// resolves relative links.
// =============================================================================

use url::{Host, Url};

use crate::config::ScopePolicy;

// Second-level labels that sit under a country TLD, as in "example.co.uk".
// Not a full public suffix list; covers the common registries.
const COUNTRY_SECOND_LEVELS: &[&str] = &["co", "com", "net", "org", "gov", "ac", "edu"];

/// The seed's host, parsed once and compared against every candidate.
#[derive(Debug, Clone)]
pub struct SiteScope {
    policy: ScopePolicy,
    host: String,
    port: Option<u16>,
    is_ip: bool,
}

impl SiteScope {
    /// None when the seed has no host (e.g. a file: URL).
    pub fn new(seed: &Url, policy: ScopePolicy) -> Option<Self> {
        let host = seed.host()?;
        let is_ip = !matches!(host, Host::Domain(_));

        Some(Self {
            policy,
            host: host.to_string().to_lowercase(),
            port: seed.port(),
            is_ip,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn policy(&self) -> ScopePolicy {
        self.policy
    }

    pub fn contains(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_lowercase();

        match self.policy {
            // IP addresses have no domain hierarchy to widen over
            _ if self.is_ip => host == self.host && url.port() == self.port,
            ScopePolicy::Exact => host == self.host && url.port() == self.port,
            ScopePolicy::RootDomain => root_domain(&host) == root_domain(&self.host),
            ScopePolicy::Suffix => is_same_or_subdomain(&host, &self.host),
        }
    }

    pub fn contains_str(&self, url: &str) -> bool {
        Url::parse(url).map(|u| self.contains(&u)).unwrap_or(false)
    }
}

/// Convenience wrapper around [`SiteScope`] for one-off checks.
pub fn in_scope(url: &str, base: &Url, policy: ScopePolicy) -> bool {
    SiteScope::new(base, policy)
        .map(|scope| scope.contains_str(url))
        .unwrap_or(false)
}

fn is_same_or_subdomain(host: &str, base: &str) -> bool {
    host == base
        || host
            .strip_suffix(base)
            .map(|prefix| prefix.ends_with('.'))
            .unwrap_or(false)
}

// "a.b.example.co.uk" -> "example.co.uk", "blog.example.com" -> "example.com"
fn root_domain(host: &str) -> &str {
    let host = host.trim_end_matches('.');
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 2 {
        return host;
    }

    let tld = labels[labels.len() - 1];
    let second = labels[labels.len() - 2];
    let keep = if tld.len() == 2 && COUNTRY_SECOND_LEVELS.contains(&second) {
        3
    } else {
        2
    };

    if labels.len() <= keep {
        return host;
    }

    // Byte offset where the kept labels start
    let skipped: usize = labels[..labels.len() - keep]
        .iter()
        .map(|l| l.len() + 1)
        .sum();
    &host[skipped..]
}
