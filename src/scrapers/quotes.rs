//! Quotes demo site scraper.
//!
//! The simplest pipeline in the crate: one HTTP GET against
//! `quotes.toscrape.com` (a static page, no browser needed), then a
//! quote-text and author lookup inside each quote container.

use scraper::{Html, Selector};
use tracing::{info, instrument, warn};
use url::Url;

use crate::config::SiteConfig;
use crate::error::ScrapeResult;
use crate::extract::chain_text;
use crate::models::Quote;

/// Fetch the quotes page and print every quote/author pair.
#[instrument(level = "info")]
pub async fn scrape() -> ScrapeResult<Vec<Quote>> {
    let cfg = SiteConfig::quotes();
    let url = Url::parse(&cfg.target_url)?;
    info!(%url, "fetching quotes page");

    let body = reqwest::get(url)
        .await?
        .error_for_status()?
        .text()
        .await?;

    let quotes = parse_quotes(&body);
    info!(count = quotes.len(), "extracted quotes");

    for quote in &quotes {
        println!("Quote: {}", quote.text);
        println!("Author: {}", quote.author);
        println!("{}", "-".repeat(50));
    }
    Ok(quotes)
}

/// Pull (text, author) pairs out of the quote containers. A container
/// missing either leaf is skipped; the rest of the batch is unaffected.
pub fn parse_quotes(html: &str) -> Vec<Quote> {
    let document = Html::parse_document(html);
    let container = Selector::parse("div.quote").unwrap();

    document
        .select(&container)
        .filter_map(|quote| {
            let text = chain_text(quote, &["span.text"]);
            let author = chain_text(quote, &["small.author"]);
            match (text, author) {
                (Some(text), Some(author)) => Some(Quote { text, author }),
                _ => {
                    warn!("quote container missing text or author; skipping");
                    None
                }
            }
        })
        .collect()
}
