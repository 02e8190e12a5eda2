//! HKTVmall product-search scraper.
//!
//! The search page renders either an outer `product-brief-wrapper` span per
//! product or, in some variants, bare `info-wrapper` divs. Resolution waits
//! on the two candidates in that order; extraction mirrors the split with a
//! primary nested chain and a fallback that tolerates a missing
//! `upper-wrapper` level.

use scraper::{Html, Selector};
use tracing::{info, instrument, warn};

use crate::config::SiteConfig;
use crate::error::ScrapeResult;
use crate::extract::{chain_text, descend, text_of};
use crate::page::PageDriver;
use crate::resolve::{first_matching_selector, log_content_hints};

/// Scrape the search results and print one product name per line.
#[instrument(level = "info", skip_all)]
pub async fn scrape<D: PageDriver>(page: &D) -> ScrapeResult<Vec<String>> {
    scrape_with(page, SiteConfig::retail_search()).await
}

pub async fn scrape_with<D: PageDriver>(page: &D, cfg: SiteConfig) -> ScrapeResult<Vec<String>> {
    info!(url = %cfg.target_url, "loading product search");
    page.goto(&cfg.target_url).await?;

    let found = first_matching_selector(page, &cfg.candidate_selectors, cfg.wait_timeout).await?;
    let html = page.content().await?;
    if found.is_none() {
        warn!("neither product wrapper appeared");
        log_content_hints(&html);
        return Ok(Vec::new());
    }

    let names = parse_product_names(&html);
    info!(count = names.len(), "extracted product names");
    for name in &names {
        println!("{name}");
    }
    Ok(names)
}

/// Product names via the primary wrapper chain, falling back to bare
/// info-wrappers when the page renders without the outer span.
pub fn parse_product_names(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let brief = Selector::parse("span.product-brief-wrapper").unwrap();

    let briefs: Vec<_> = document.select(&brief).collect();
    if !briefs.is_empty() {
        return briefs
            .into_iter()
            .filter_map(|product| {
                let name = chain_text(
                    product,
                    &["div.info-wrapper", "div.upper-wrapper", "div.brand-product-name"],
                );
                if name.is_none() {
                    warn!("product wrapper missing nested name; skipping");
                }
                name.filter(|n| !n.is_empty())
            })
            .collect();
    }

    // Fallback: the same leaf reached from bare info-wrappers, with or
    // without the upper-wrapper level in between.
    let info = Selector::parse("div.info-wrapper").unwrap();
    document
        .select(&info)
        .filter_map(|wrapper| {
            let name = match descend(wrapper, &["div.upper-wrapper"]) {
                Some(upper) => descend(upper, &["div.brand-product-name"]),
                None => descend(wrapper, &["div.brand-product-name"]),
            };
            if name.is_none() {
                warn!("info wrapper missing product name; skipping");
            }
            name.map(text_of).filter(|n| !n.is_empty())
        })
        .collect()
}
