//! YouTube channel video listing scraper.
//!
//! Waits for the video-title anchors on the channel's /videos tab, scrolls a
//! few times to pull more of the lazy grid in, then reads each anchor's
//! `title` attribute, falling back to the anchor text when the attribute is
//! absent. Anchors with neither are counted and skipped.

use scraper::{Html, Selector};
use tracing::{info, instrument, warn};

use crate::config::SiteConfig;
use crate::error::ScrapeResult;
use crate::interact::scroll_and_load_more;
use crate::page::PageDriver;
use crate::resolve::log_content_hints;

/// Scrape the channel listing and print numbered video titles.
#[instrument(level = "info", skip_all)]
pub async fn scrape<D: PageDriver>(page: &D) -> ScrapeResult<Vec<String>> {
    scrape_with(page, SiteConfig::channel_videos()).await
}

pub async fn scrape_with<D: PageDriver>(page: &D, cfg: SiteConfig) -> ScrapeResult<Vec<String>> {
    info!(url = %cfg.target_url, "loading channel videos");
    page.goto(&cfg.target_url).await?;

    let Some(anchor_selector) = cfg.candidate_selectors.first() else {
        warn!("no candidate selectors configured");
        log_content_hints(&page.content().await?);
        return Ok(Vec::new());
    };
    if !page.wait_for_selector(anchor_selector, cfg.wait_timeout).await? {
        warn!(selector = %anchor_selector, "video titles never appeared");
        log_content_hints(&page.content().await?);
        return Ok(Vec::new());
    }

    scroll_and_load_more(page, &cfg).await?;

    let html = page.content().await?;
    let titles = parse_video_titles(&html);
    info!(count = titles.len(), "extracted video titles");

    println!("Found {} video titles:", titles.len());
    for (i, title) in titles.iter().enumerate() {
        println!("{}. {}", i + 1, title);
    }
    Ok(titles)
}

/// Titles from every `a#video-title-link`: the `title` attribute when
/// present, otherwise the trimmed anchor text.
pub fn parse_video_titles(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let anchor = Selector::parse("a#video-title-link").unwrap();

    document
        .select(&anchor)
        .filter_map(|link| {
            let title = match link.value().attr("title") {
                Some(attr) if !attr.trim().is_empty() => attr.trim().to_string(),
                _ => link.text().collect::<Vec<_>>().join(" ").trim().to_string(),
            };
            if title.is_empty() {
                warn!("video anchor with empty title; skipping");
                return None;
            }
            Some(title)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::FixturePage;

    const FIXTURE: &str = r#"
        <html><body>
            <a id="video-title-link" title="How Money Moves">ignored text</a>
            <a id="video-title-link">The Chip Race</a>
            <a id="video-title-link" title="  "></a>
        </body></html>
    "#;

    #[test]
    fn title_attribute_wins_over_anchor_text() {
        let titles = parse_video_titles(FIXTURE);
        assert_eq!(titles, vec!["How Money Moves", "The Chip Race"]);
    }

    #[test]
    fn parse_is_idempotent() {
        assert_eq!(parse_video_titles(FIXTURE), parse_video_titles(FIXTURE));
    }

    #[tokio::test]
    async fn full_run_against_a_fixture() {
        let page = FixturePage::new(FIXTURE);
        let titles = scrape_with(&page, SiteConfig::channel_videos().without_delays())
            .await
            .unwrap();
        assert_eq!(titles.len(), 2);
    }

    #[tokio::test]
    async fn empty_candidate_ladder_degrades_to_empty() {
        let page = FixturePage::new(FIXTURE);
        let mut cfg = SiteConfig::channel_videos().without_delays();
        cfg.candidate_selectors.clear();
        let titles = scrape_with(&page, cfg).await.unwrap();
        assert!(titles.is_empty());
    }

    #[tokio::test]
    async fn missing_anchors_degrade_to_empty() {
        let page = FixturePage::new("<html><body><p>consent interstitial</p></body></html>");
        let titles = scrape_with(&page, SiteConfig::channel_videos().without_delays())
            .await
            .unwrap();
        assert!(titles.is_empty());
    }
}
