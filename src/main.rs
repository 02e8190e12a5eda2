//! # Page Harvest
//!
//! A collection of standalone site scrapers sharing one small toolkit:
//! adaptive selector resolution with a diagnostic fallback, a bounded
//! scroll/load-more loop, nullable nested extraction chains, and simple
//! console/CSV/PDF sinks.
//!
//! ## Usage
//!
//! ```sh
//! page_harvest quotes
//! page_harvest latest-news --pdf -o ./out
//! page_harvest markets -o ./out
//! ```
//!
//! ## Architecture
//!
//! Each invocation runs exactly one site pipeline:
//! 1. **Acquisition**: HTTP GET, or a scoped Chromium session
//! 2. **Resolution**: ordered candidate selectors, first match wins
//! 3. **Interaction**: bounded scrolls and load-more clicks
//! 4. **Extraction**: fixed nested selector chains, per-record nullable
//! 5. **Output**: console records plus optional CSV/PDF artifacts
//!
//! The browser session is scoped to the invocation and released on every
//! exit path, including scraper failures.

use std::path::Path;

use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod error;
mod extract;
mod interact;
mod models;
mod outputs;
mod page;
mod resolve;
mod scrapers;
mod utils;

use cli::{Cli, Site};
use error::ScrapeResult;
use page::{BrowserPage, BrowserSession};
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> ScrapeResult<()> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("page_harvest starting up");

    let args = Cli::parse();
    debug!(?args.site, ?args.output_dir, "Parsed CLI arguments");

    // Early check: anything that writes files needs a writable directory
    // before we spend time on a browser.
    if args.site.writes_files(args.pdf) {
        if let Err(e) = ensure_writable_dir(&args.output_dir).await {
            error!(
                path = %args.output_dir,
                error = %e,
                "Output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    if args.site.needs_browser() {
        // Launch failure is fatal. After launch, the session must be closed
        // on every path, so the scraper result is held until close() runs.
        let session = BrowserSession::launch(args.headed).await?;
        let result = run_browser_site(session.page(), &args).await;
        session.close().await;
        result?;
    } else {
        scrapers::quotes::scrape().await?;
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

async fn run_browser_site(page: &BrowserPage, args: &Cli) -> ScrapeResult<()> {
    let output_dir = Path::new(&args.output_dir);
    match args.site {
        Site::GradPrograms => {
            scrapers::grad_programs::scrape(page).await?;
        }
        Site::LatestNews => {
            let pdf_path = args.pdf.then(|| output_dir.join("bloomberg_latest_news.pdf"));
            scrapers::latest_news::scrape(page, pdf_path.as_deref()).await?;
        }
        Site::Retail => {
            scrapers::retail::scrape(page).await?;
        }
        Site::Videos => {
            scrapers::videos::scrape(page).await?;
        }
        Site::Markets => {
            scrapers::markets::scrape(page, output_dir).await?;
        }
        Site::Quotes => unreachable!("quotes runs without a browser"),
    }
    Ok(())
}
