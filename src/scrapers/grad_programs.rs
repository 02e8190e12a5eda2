//! Berkeley graduate program list scraper.
//!
//! Waits for the program grid, scrolls a few times to flush lazy content,
//! then descends `program-grid → title div → anchor → paragraph` for each
//! grid entry. When nothing at all is found, the page gets the diagnostic
//! class-keyword dump instead of output.

use scraper::{Html, Selector};
use tracing::{info, instrument, warn};

use crate::config::SiteConfig;
use crate::error::ScrapeResult;
use crate::extract::chain_text;
use crate::interact::scroll_and_load_more;
use crate::page::PageDriver;
use crate::resolve::log_content_hints;

/// Scrape the program listing and print one title per line.
#[instrument(level = "info", skip_all)]
pub async fn scrape<D: PageDriver>(page: &D) -> ScrapeResult<Vec<String>> {
    scrape_with(page, SiteConfig::grad_programs()).await
}

pub async fn scrape_with<D: PageDriver>(page: &D, cfg: SiteConfig) -> ScrapeResult<Vec<String>> {
    info!(url = %cfg.target_url, "loading program list");
    page.goto(&cfg.target_url).await?;

    let Some(grid_selector) = cfg.candidate_selectors.first() else {
        warn!("no candidate selectors configured");
        log_content_hints(&page.content().await?);
        return Ok(Vec::new());
    };
    if !page.wait_for_selector(grid_selector, cfg.wait_timeout).await? {
        warn!(selector = %grid_selector, "program grid never appeared");
        log_content_hints(&page.content().await?);
        return Ok(Vec::new());
    }

    scroll_and_load_more(page, &cfg).await?;

    let html = page.content().await?;
    let titles = parse_program_titles(&html);
    info!(count = titles.len(), "extracted program titles");

    if titles.is_empty() {
        // Degraded debug dump so a markup change is diagnosable from the log.
        warn!(bytes = html.len(), "no titles found; dumping content hints");
        log_content_hints(&html);
    }
    for title in &titles {
        println!("{title}");
    }
    Ok(titles)
}

/// Titles from every `div.program-grid` entry. A grid entry whose nested
/// chain breaks is logged and skipped.
pub fn parse_program_titles(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let grid = Selector::parse("div.program-grid").unwrap();

    document
        .select(&grid)
        .filter_map(|program| {
            let title = chain_text(program, &["div.program-grid--title div a", "p"]);
            if title.is_none() {
                warn!("program entry missing nested title; skipping");
            }
            title.filter(|t| !t.is_empty())
        })
        .collect()
}
