// src/render/site.rs
// =============================================================================
// Turns a finished crawl into one PDF per domain.
//
// Layout on disk (output_dir defaults to "pdfs"):
//
//   pdfs/
//     example_com/                     <- one PDF per valid page
//       0000_example_com_index.pdf
//       0001_example_com_docs_intro.pdf
//     example_com.pdf                  <- everything merged, in page order
//
// The numeric prefix keeps merge order stable and stops two URLs that
// flatten to the same name from overwriting each other.
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, warn};
use url::Url;

use crate::config::RenderConfig;
use crate::crawl::CrawlReport;

use super::pdf::{DocumentMerger, PageRenderer};

#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderSummary {
    pub rendered: Vec<PathBuf>,
    /// URLs whose render failed; they are left out of the merged document
    pub failed: Vec<String>,
    pub merged: Option<PathBuf>,
}

// "docs.example.com" -> "docs_example_com", "127.0.0.1:8080" -> "127_0_0_1_8080"
pub fn domain_slug(url: &Url) -> String {
    let host = url.host_str().unwrap_or("site");
    match url.port() {
        Some(port) => sanitize(&format!("{host}:{port}")),
        None => sanitize(host),
    }
}

// Builds the per-page file name from host and path
//
// Examples:
//   https://example.com/            -> example_com_index.pdf
//   https://example.com/docs/intro/ -> example_com_docs_intro.pdf
//   https://example.com/list?page=2 -> example_com_list_page_2.pdf
pub fn pdf_file_name(url: &Url) -> String {
    let path = url.path().trim_matches('/');
    let mut stem = if path.is_empty() {
        String::from("index")
    } else {
        path.replace('/', "_")
    };

    if let Some(query) = url.query() {
        stem.push('_');
        stem.push_str(query);
    }

    format!("{}_{}.pdf", domain_slug(url), sanitize(&stem))
}

fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub async fn render_site(
    report: &CrawlReport,
    renderer: &dyn PageRenderer,
    merger: &dyn DocumentMerger,
    config: &RenderConfig,
    workers: usize,
) -> Result<RenderSummary> {
    let seed = Url::parse(&report.seed).with_context(|| format!("Invalid seed {}", report.seed))?;
    let slug = domain_slug(&seed);

    let page_dir = config.output_dir.join(&slug);
    tokio::fs::create_dir_all(&page_dir)
        .await
        .with_context(|| format!("Failed to create {}", page_dir.display()))?;

    info!(domain = %slug, pages = report.valid_links.len(), "rendering pages");

    // buffered() keeps results in input order, unlike buffer_unordered()
    let page_dir = page_dir.as_path();
    let results: Vec<(String, Result<PathBuf>)> = stream::iter(report.valid_links.iter().enumerate())
        .map(|(index, link)| async move {
            let result = render_one(renderer, link, index, page_dir).await;
            (link.clone(), result)
        })
        .buffered(workers.max(1))
        .collect()
        .await;

    let mut summary = RenderSummary::default();
    for (link, result) in results {
        match result {
            Ok(path) => summary.rendered.push(path),
            Err(e) => {
                warn!(url = %link, error = %e, "render failed, skipping page");
                summary.failed.push(link);
            }
        }
    }

    if summary.rendered.is_empty() {
        warn!(domain = %slug, "no pages rendered, nothing to merge");
        return Ok(summary);
    }

    let output = config.output_dir.join(format!("{slug}.pdf"));
    let merged = merger
        .merge(&summary.rendered, &output)
        .await
        .with_context(|| format!("Failed to merge documents for {slug}"))?;
    info!(output = %merged.display(), "merged document written");
    summary.merged = Some(merged);

    Ok(summary)
}

async fn render_one(
    renderer: &dyn PageRenderer,
    link: &str,
    index: usize,
    page_dir: &Path,
) -> Result<PathBuf> {
    let url = Url::parse(link).map_err(|e| anyhow!("Invalid URL {link}: {e}"))?;
    let output = page_dir.join(format!("{index:04}_{}", pdf_file_name(&url)));
    renderer.render(link, &output).await
}
