// src/render/pdf.rs
// =============================================================================
// External tools that turn pages into PDFs.
//
// - WkhtmltopdfRenderer: `wkhtmltopdf --quiet <url> <output.pdf>`
// - PdfuniteMerger:      `pdfunite <in1.pdf> <in2.pdf> ... <output.pdf>`
//
// Both sit behind small traits so the render stage can be tested without
// either program installed.
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Renders `url` into `output` and returns the written path.
    async fn render(&self, url: &str, output: &Path) -> Result<PathBuf>;
}

#[async_trait]
pub trait DocumentMerger: Send + Sync {
    /// Concatenates `inputs` in order into `output`.
    async fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<PathBuf>;
}

#[derive(Debug, Clone)]
pub struct WkhtmltopdfRenderer {
    bin: String,
}

impl WkhtmltopdfRenderer {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

impl Default for WkhtmltopdfRenderer {
    fn default() -> Self {
        Self::new("wkhtmltopdf")
    }
}

#[async_trait]
impl PageRenderer for WkhtmltopdfRenderer {
    async fn render(&self, url: &str, output: &Path) -> Result<PathBuf> {
        debug!(%url, output = %output.display(), "rendering page");

        let result = Command::new(&self.bin)
            .arg("--quiet")
            .arg(url)
            .arg(output)
            .output()
            .await
            .with_context(|| format!("Failed to run {}", self.bin))?;

        if !result.status.success() {
            // wkhtmltopdf exits non-zero when a sub-resource fails to load,
            // even though the PDF itself was written
            if output.exists() {
                warn!(%url, status = %result.status, "renderer reported errors, keeping output");
            } else {
                bail!(
                    "{} failed for {} ({}): {}",
                    self.bin,
                    url,
                    result.status,
                    String::from_utf8_lossy(&result.stderr).trim()
                );
            }
        }

        Ok(output.to_path_buf())
    }
}

#[derive(Debug, Clone)]
pub struct PdfuniteMerger {
    bin: String,
}

impl PdfuniteMerger {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

impl Default for PdfuniteMerger {
    fn default() -> Self {
        Self::new("pdfunite")
    }
}

#[async_trait]
impl DocumentMerger for PdfuniteMerger {
    async fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<PathBuf> {
        match inputs {
            [] => bail!("nothing to merge into {}", output.display()),
            [single] => {
                tokio::fs::copy(single, output).await.with_context(|| {
                    format!("Failed to copy {} to {}", single.display(), output.display())
                })?;
            }
            _ => {
                let result = Command::new(&self.bin)
                    .args(inputs)
                    .arg(output)
                    .output()
                    .await
                    .with_context(|| format!("Failed to run {}", self.bin))?;

                if !result.status.success() {
                    bail!(
                        "{} failed ({}): {}",
                        self.bin,
                        result.status,
                        String::from_utf8_lossy(&result.stderr).trim()
                    );
                }
            }
        }

        Ok(output.to_path_buf())
    }
}
