// src/checker/html.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Extraction and resolution are split on purpose: extract_anchors() only
// reads the document, resolve_href() turns one href into an absolute URL
// against the page it was found on.
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

/// One `<a href>` element: the raw href and its visible text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub text: String,
}

// Extracts every anchor with an href, in document order
//
// Example:
//   html = "<a href='/docs'>Read the docs</a>"
//   result = [Anchor { href: "/docs", text: "Read the docs" }]
pub fn extract_anchors(html: &str) -> Vec<Anchor> {
    let document = Html::parse_document(html);

    // Constant selector, known to be valid
    let selector = Selector::parse("a[href]").unwrap();

    document
        .select(&selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?.trim();
            if href.is_empty() {
                return None;
            }

            // Collapse the text nodes into single-spaced anchor text
            let text = element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ");

            Some(Anchor {
                href: href.to_string(),
                text,
            })
        })
        .collect()
}

// Resolves a possibly-relative href to an absolute http(s) URL
//
// Parameters:
//   base: the URL of the page the href was found on
//   href: the raw attribute value
//
// Returns: Some(absolute_url) without its fragment, or None for anchors,
// special protocols, and anything that does not resolve to http/https.
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs"              -> Some("https://example.com/docs")
//   href = "../other#top"       -> Some("https://example.com/other")
//   href = "javascript:void(0)" -> None
pub fn resolve_href(base: &Url, href: &str) -> Option<String> {
    if href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
        || href.starts_with("data:")
    {
        return None;
    }

    let mut url = base.join(href).ok()?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    Some(url.to_string())
}
