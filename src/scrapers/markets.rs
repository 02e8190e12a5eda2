//! Yahoo Finance crypto screener scraper.
//!
//! Waits for the screener table, pulls every row of the first table (header
//! included) as opaque cell strings, and writes them to one CSV file. Prices
//! and percentages are not parsed; cells go to the CSV exactly as rendered.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::config::SiteConfig;
use crate::error::ScrapeResult;
use crate::extract::table_rows;
use crate::outputs::csv;
use crate::page::PageDriver;
use crate::resolve::log_content_hints;

const CSV_FILENAME: &str = "crypto_data.csv";

/// Scrape the screener table into `{output_dir}/crypto_data.csv`.
///
/// Returns the written path, or `None` when no table was found.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn scrape<D: PageDriver>(page: &D, output_dir: &Path) -> ScrapeResult<Option<PathBuf>> {
    scrape_with(page, SiteConfig::crypto_table(), output_dir).await
}

pub async fn scrape_with<D: PageDriver>(
    page: &D,
    cfg: SiteConfig,
    output_dir: &Path,
) -> ScrapeResult<Option<PathBuf>> {
    info!(url = %cfg.target_url, "loading crypto screener");
    page.goto(&cfg.target_url).await?;

    match cfg.candidate_selectors.first() {
        Some(table_selector) => {
            if !page.wait_for_selector(table_selector, cfg.wait_timeout).await? {
                warn!("table never appeared");
            }
        }
        None => warn!("no candidate selectors configured"),
    }

    let html = page.content().await?;
    let Some(rows) = table_rows(&html) else {
        println!("No table found.");
        log_content_hints(&html);
        return Ok(None);
    };
    info!(rows = rows.len(), "extracted table rows");

    let path = output_dir.join(CSV_FILENAME);
    csv::write_rows(&path, &rows).await?;
    println!("CSV file '{}' has been created.", path.display());
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::FixturePage;

    const FIXTURE: &str = r#"
        <html><body>
            <table>
                <tr><th>Symbol</th><th>Name</th><th>Price</th></tr>
                <tr><td>BTC-USD</td><td>Bitcoin</td><td>64,021.55</td></tr>
                <tr><td>ETH-USD</td><td>Ethereum</td><td>3,112.04</td></tr>
            </table>
        </body></html>
    "#;

    #[tokio::test]
    async fn writes_one_csv_row_per_table_row() {
        let dir = std::env::temp_dir().join("page_harvest_markets_test");
        let page = FixturePage::new(FIXTURE);

        let path = scrape_with(&page, SiteConfig::crypto_table().without_delays(), &dir)
            .await
            .unwrap()
            .expect("table should be found");

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Symbol,Name,Price");
        assert_eq!(lines[1], "BTC-USD,Bitcoin,\"64,021.55\"");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn empty_candidate_ladder_still_extracts_the_table() {
        let dir = std::env::temp_dir().join("page_harvest_markets_no_ladder_test");
        let page = FixturePage::new(FIXTURE);
        let mut cfg = SiteConfig::crypto_table().without_delays();
        cfg.candidate_selectors.clear();

        // The wait is advisory; extraction still runs against the content.
        let path = scrape_with(&page, cfg, &dir).await.unwrap();
        assert!(path.is_some());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn missing_table_writes_nothing() {
        let dir = std::env::temp_dir().join("page_harvest_markets_none_test");
        let page = FixturePage::new("<html><body><p>no data</p></body></html>");

        let path = scrape_with(&page, SiteConfig::crypto_table().without_delays(), &dir)
            .await
            .unwrap();
        assert!(path.is_none());
        assert!(!dir.join(CSV_FILENAME).exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
