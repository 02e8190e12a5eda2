//! Bloomberg "Latest News" scraper.
//!
//! The most involved pipeline in the crate, and the reason most of the
//! shared toolkit exists:
//!
//! 1. navigate, then check the title for a bot wall (one grace wait for a
//!    human to clear it; still blocked means early exit),
//! 2. dismiss the cookie/consent banner if one shows up,
//! 3. resolve the story container through an eight-candidate ladder, from
//!    the exact hashed class down to generic `article`/`.story` selectors,
//! 4. scroll and click "Load More" under separate scroll/click budgets,
//! 5. descend the title and timestamp chains inside each container,
//! 6. print the stories and optionally write the PDF report.
//!
//! When the whole ladder misses, the run degrades to the diagnostic
//! class-keyword dump plus a best-effort headline listing, and returns
//! empty-handed rather than failing.

use std::path::Path;
use std::time::Duration;

use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};

use crate::config::SiteConfig;
use crate::error::ScrapeResult;
use crate::extract::chain_text;
use crate::interact::{dismiss_consent, scroll_and_load_more};
use crate::models::Story;
use crate::outputs::pdf;
use crate::page::{pass_bot_wall, PageDriver};
use crate::resolve::{first_matching_selector, log_content_hints, scan_for_headlines};

const BOT_WALL_GRACE: Duration = Duration::from_secs(30);

const REPORT_TITLE: &str = "Bloomberg Latest News Report";

const TITLE_CHAIN: [&str; 3] = ["div.Latest_itemTextContainer__YMnVV", "a", "div span"];
const TIMESTAMP_CHAIN: [&str; 3] = [
    "div.Latest_desktopTimestamp__oiCLC",
    "div.Latest_itemTimestamp__SqjF_",
    "time",
];

/// Scrape the latest-news listing; print every story and, when asked,
/// write the PDF report to `pdf_path`.
#[instrument(level = "info", skip_all)]
pub async fn scrape<D: PageDriver>(page: &D, pdf_path: Option<&Path>) -> ScrapeResult<Vec<Story>> {
    scrape_with(page, SiteConfig::latest_news(), BOT_WALL_GRACE, pdf_path).await
}

pub async fn scrape_with<D: PageDriver>(
    page: &D,
    cfg: SiteConfig,
    bot_wall_grace: Duration,
    pdf_path: Option<&Path>,
) -> ScrapeResult<Vec<Story>> {
    info!(url = %cfg.target_url, "loading latest-news page");
    page.goto(&cfg.target_url).await?;

    pass_bot_wall(page, bot_wall_grace).await?;

    if !dismiss_consent(page, &cfg).await? {
        debug!("no consent banner to dismiss");
    }
    tokio::time::sleep(cfg.settle_delay).await;

    let Some(container) =
        first_matching_selector(page, &cfg.candidate_selectors, cfg.wait_timeout).await?
    else {
        // Degraded mode: show what the page does contain, then return.
        let html = page.content().await?;
        log_content_hints(&html);
        let headlines = scan_for_headlines(&html);
        if !headlines.is_empty() {
            info!(count = headlines.len(), "headlines via fallback scan");
            for (i, headline) in headlines.iter().take(10).enumerate() {
                println!("{}. {}", i + 1, headline);
            }
        }
        return Ok(Vec::new());
    };

    scroll_and_load_more(page, &cfg).await?;

    let html = page.content().await?;
    let stories = parse_stories(&html, &container);
    info!(count = stories.len(), "extracted stories");

    println!("=== Found {} articles ===", stories.len());
    for (i, story) in stories.iter().enumerate() {
        println!("{}. Title: {}", i + 1, story.title);
        println!("   Time: {}", story.timestamp);
        println!("{}", "-".repeat(80));
    }

    if let Some(path) = pdf_path {
        if stories.is_empty() {
            warn!("no data to export to PDF");
        } else {
            pdf::write_story_report(path, REPORT_TITLE, &stories).await?;
        }
    }
    Ok(stories)
}

/// One [`Story`] per container element whose title and timestamp chains both
/// resolve. A container broken at any hop is logged and skipped without
/// touching the rest of the batch.
pub fn parse_stories(html: &str, container_selector: &str) -> Vec<Story> {
    let document = Html::parse_document(html);
    let Ok(container) = Selector::parse(container_selector) else {
        warn!(selector = %container_selector, "unparseable container selector");
        return Vec::new();
    };

    document
        .select(&container)
        .filter_map(|story| {
            let title = chain_text(story, &TITLE_CHAIN);
            let timestamp = chain_text(story, &TIMESTAMP_CHAIN);
            match (title, timestamp) {
                (Some(title), Some(timestamp)) if !title.is_empty() => {
                    Some(Story { title, timestamp })
                }
                _ => {
                    warn!("story container missing title or timestamp; skipping");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::FixturePage;

    fn story_div(title: &str, time: &str) -> String {
        format!(
            r#"<div class="Latest_storyPadding__GBJUE">
                <div class="Latest_itemTextContainer__YMnVV">
                    <a href="/news/x"><div><span>{title}</span></div></a>
                </div>
                <div class="Latest_desktopTimestamp__oiCLC">
                    <div class="Latest_itemTimestamp__SqjF_"><time>{time}</time></div>
                </div>
            </div>"#
        )
    }

    fn listing_fixture() -> String {
        let broken = r#"<div class="Latest_storyPadding__GBJUE">
            <div class="Latest_itemTextContainer__YMnVV">
                <span>title without the anchor hop</span>
            </div>
        </div>"#;
        format!(
            "<html><body>{}{}{}</body></html>",
            story_div("Fed Holds Rates Steady", "10 minutes ago"),
            broken,
            story_div("Oil Slides Below $70", "25 minutes ago"),
        )
    }

    #[test]
    fn broken_container_is_skipped_others_survive_in_order() {
        let stories = parse_stories(&listing_fixture(), "div.Latest_storyPadding__GBJUE");
        assert_eq!(stories.len(), 2);
        assert_eq!(stories[0].title, "Fed Holds Rates Steady");
        assert_eq!(stories[0].timestamp, "10 minutes ago");
        assert_eq!(stories[1].title, "Oil Slides Below $70");
    }

    #[test]
    fn parse_is_idempotent() {
        let html = listing_fixture();
        assert_eq!(
            parse_stories(&html, "div.Latest_storyPadding__GBJUE"),
            parse_stories(&html, "div.Latest_storyPadding__GBJUE"),
        );
    }

    #[tokio::test]
    async fn full_run_extracts_stories_and_counts_clicks() {
        let html = format!(
            "<html><body>{}<button id=\"load-more\">Load More</button></body></html>",
            story_div("Yen Rallies", "2 minutes ago"),
        );
        let page = FixturePage::new(html).with_clickable("#load-more", 9);

        let cfg = SiteConfig::latest_news().without_delays();
        let max_clicks = cfg.max_clicks as usize;
        let stories = scrape_with(&page, cfg, Duration::ZERO, None).await.unwrap();

        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].title, "Yen Rallies");
        // More eligible clicks than budget; the budget wins.
        assert_eq!(page.clicks_performed(), max_clicks);
    }

    #[tokio::test]
    async fn bot_wall_aborts_before_extraction() {
        let page = FixturePage::new("<html></html>").with_title("Are you a robot?");
        let cfg = SiteConfig::latest_news().without_delays();
        assert!(scrape_with(&page, cfg, Duration::ZERO, None).await.is_err());
    }

    #[tokio::test]
    async fn exhausted_ladder_returns_empty_after_fallback_scan() {
        let page = FixturePage::new(
            r#"<html><body><h2 class="redesigned-headline">Still news</h2></body></html>"#,
        );
        let mut cfg = SiteConfig::latest_news().without_delays();
        // Trim the generic tail so the fixture defeats the whole ladder.
        cfg.candidate_selectors = vec![
            "div.Latest_storyPadding__GBJUE".to_string(),
            "[class*='storyPadding']".to_string(),
        ];
        let stories = scrape_with(&page, cfg, Duration::ZERO, None).await.unwrap();
        assert!(stories.is_empty());
    }
}
