// src/checker/mod.rs
// =============================================================================
// Everything needed to judge a single link.
//
// Submodules:
// - http:      the HttpProbe trait and its reqwest implementation
// - html:      extracts anchors from HTML pages and resolves their hrefs
// - validator: HEAD-then-GET link validation with soft-404 detection
// - keywords:  the optional keyword filter
//
// This file (mod.rs) re-exports the public API so callers can write
// `checker::LinkValidator` instead of `checker::validator::LinkValidator`.
// =============================================================================

mod html;
mod http;
mod keywords;
mod validator;

#[cfg(test)]
pub(crate) mod testing;

pub use html::{extract_anchors, resolve_href, Anchor};
pub use http::{is_error_status, FetchedPage, HttpProbe, ReqwestProbe};
pub use keywords::KeywordFilter;
pub use validator::{InvalidReason, LinkValidator, ProbeOutcome, Verdict};
