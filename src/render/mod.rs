// src/render/mod.rs
// Rendering valid pages to PDF and merging them per domain.

mod pdf;
mod site;

pub use pdf::{DocumentMerger, PageRenderer, PdfuniteMerger, WkhtmltopdfRenderer};
pub use site::{domain_slug, pdf_file_name, render_site, RenderSummary};
