// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap and merge them with the config
// 2. Crawl each domain, validating every internal link
// 3. Render the valid pages to PDF and merge them per domain
// 4. Exit with proper code (0 = success, 1 = a domain failed, 2 = error)
// =============================================================================

mod cli; // src/cli.rs - command-line parsing

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;

use cli::Cli;
use site2pdf::checker::ReqwestProbe;
use site2pdf::config::FileConfig;
use site2pdf::crawl::{ConsoleObserver, CrawlObserver, LogObserver};
use site2pdf::render::{render_site, PdfuniteMerger, RenderSummary, WkhtmltopdfRenderer};
use site2pdf::{CrawlReport, SiteCrawler};

// What happened to one domain, printed as JSON with --json
#[derive(Debug, Serialize)]
struct DomainOutcome {
    domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<CrawlReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    render: Option<RenderSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl DomainOutcome {
    fn failed(&self) -> bool {
        self.error.is_some()
    }
}

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every domain crawled (and rendered, unless --crawl-only)
//   Ok(1) = at least one domain was unreachable or could not be rendered
//   Err   = bad configuration or another unexpected error
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.log_level)?;

    let mut config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    cli.apply_to(&mut config);
    config.crawl.validate()?;

    // One client for every domain, so connection pools are reused
    let probe = ReqwestProbe::new(&config.crawl)?;
    let crawler = SiteCrawler::new(config.crawl.clone(), probe);
    let renderer = WkhtmltopdfRenderer::new(config.render.renderer_bin.as_str());
    let merger = PdfuniteMerger::new(config.render.merger_bin.as_str());

    let mut outcomes = Vec::new();
    for domain in &cli.domains {
        // Fresh per domain so page numbers start at 1 even after a failed seed
        let console = ConsoleObserver::new();
        let observer: &dyn CrawlObserver = if cli.json { &LogObserver } else { &console };

        if !cli.json {
            println!("🔍 Crawling {}", domain);
        }

        let report = match crawler.crawl(domain, observer).await {
            Ok(report) => report,
            Err(e) => {
                warn!(%domain, error = %e, "skipping domain");
                if !cli.json {
                    println!("❌ {}\n", e);
                }
                outcomes.push(DomainOutcome {
                    domain: domain.clone(),
                    report: None,
                    render: None,
                    error: Some(e.to_string()),
                });
                continue;
            }
        };

        let mut outcome = DomainOutcome {
            domain: domain.clone(),
            report: None,
            render: None,
            error: None,
        };

        if !cli.crawl_only {
            match render_site(&report, &renderer, &merger, &config.render, crawler.config().workers).await {
                Ok(summary) => {
                    if !cli.json {
                        print_render_summary(&summary);
                    }
                    outcome.render = Some(summary);
                }
                Err(e) => {
                    if !cli.json {
                        println!("❌ Could not build the PDF: {:#}\n", e);
                    }
                    outcome.error = Some(format!("{:#}", e));
                }
            }
        }

        outcome.report = Some(report);
        outcomes.push(outcome);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    }

    let failed = outcomes.iter().filter(|o| o.failed()).count();
    if failed > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Diagnostics go to stderr so --json output on stdout stays parseable
fn init_logging(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn print_render_summary(summary: &RenderSummary) {
    for url in &summary.failed {
        println!("   ⚠️  Could not render {}", url);
    }
    match &summary.merged {
        Some(path) => println!("📄 Combined PDF saved as {}\n", path.display()),
        None => println!("📄 No pages rendered.\n"),
    }
}
