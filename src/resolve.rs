//! Adaptive selector resolution.
//!
//! Site markup drifts, so content lookups run over an ordered candidate list:
//! try each selector with a bounded wait and stop at the first one that
//! matches. The tie-break is list order, never specificity, and exhausting
//! the list is a normal outcome. When everything misses, a diagnostic scan
//! over the whole document lists elements whose class names merely *sound*
//! like content, purely to make the failure debuggable from the log.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use crate::error::ScrapeResult;
use crate::page::PageDriver;
use crate::utils::truncate_for_log;

/// Class-attribute keywords that suggest an element carries story content.
static CONTENT_CLASS_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)story|latest|article|headline").unwrap());

static HEADLINE_CLASS_HINT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)headline").unwrap());

/// Walk `candidates` in listed order with a bounded wait each; return the
/// first selector that matched, or `None` when the whole ladder misses.
pub async fn first_matching_selector<D: PageDriver>(
    page: &D,
    candidates: &[String],
    per_candidate_timeout: Duration,
) -> ScrapeResult<Option<String>> {
    for selector in candidates {
        debug!(%selector, "probing candidate selector");
        if page.wait_for_selector(selector, per_candidate_timeout).await? {
            info!(%selector, "found content selector");
            return Ok(Some(selector.clone()));
        }
    }
    warn!(
        candidates = candidates.len(),
        "no candidate selector matched"
    );
    Ok(None)
}

/// An element surfaced by the diagnostic scan.
#[derive(Debug)]
pub struct SuspectElement {
    pub tag: String,
    pub classes: String,
    pub text_preview: String,
}

/// Scan the whole document for elements whose class attribute contains a
/// content keyword. Debugging aid only; nothing downstream extracts from it.
pub fn scan_for_content_hints(html: &str) -> Vec<SuspectElement> {
    let document = Html::parse_document(html);
    let any_classed = Selector::parse("[class]").unwrap();

    document
        .select(&any_classed)
        .filter_map(|element| {
            let classes = element.value().attr("class").unwrap_or_default();
            if !CONTENT_CLASS_HINT.is_match(classes) {
                return None;
            }
            let text = element.text().collect::<Vec<_>>().join(" ");
            Some(SuspectElement {
                tag: element.value().name().to_string(),
                classes: classes.to_string(),
                text_preview: truncate_for_log(text.trim(), 100),
            })
        })
        .collect()
}

/// Headline-only variant: trimmed texts of elements whose class mentions
/// "headline". Used as the degraded console listing when resolution fails.
pub fn scan_for_headlines(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let any_classed = Selector::parse("[class]").unwrap();

    document
        .select(&any_classed)
        .filter(|element| {
            HEADLINE_CLASS_HINT.is_match(element.value().attr("class").unwrap_or_default())
        })
        .filter_map(|element| {
            let text = element.text().collect::<Vec<_>>().join(" ");
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .collect()
}

/// Log the diagnostic picture of a page that matched no candidate selector.
pub fn log_content_hints(html: &str) {
    let suspects = scan_for_content_hints(html);
    info!(count = suspects.len(), "potential story elements on page");
    for (i, suspect) in suspects.iter().take(5).enumerate() {
        info!(
            index = i + 1,
            tag = %suspect.tag,
            classes = %suspect.classes,
            text = %suspect.text_preview,
            "suspect element"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::FixturePage;

    const TWO_CANDIDATE_FIXTURE: &str = r#"
        <html><body>
            <div class="content-a"><p>alpha</p></div>
        </body></html>
    "#;

    fn candidates(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn returns_first_listed_match() {
        let page = FixturePage::new(
            r#"<div class="content-a">x</div><div class="content-b">y</div>"#,
        );
        let found = first_matching_selector(
            &page,
            &candidates(&["div.content-a", "div.content-b"]),
            Duration::ZERO,
        )
        .await
        .unwrap();
        assert_eq!(found.as_deref(), Some("div.content-a"));
    }

    #[tokio::test]
    async fn skips_absent_candidates_in_order() {
        let page = FixturePage::new(TWO_CANDIDATE_FIXTURE);
        let found = first_matching_selector(
            &page,
            &candidates(&["div.content-b", "div.content-a"]),
            Duration::ZERO,
        )
        .await
        .unwrap();
        // content-b is listed first but absent, so resolution falls through.
        assert_eq!(found.as_deref(), Some("div.content-a"));
    }

    #[tokio::test]
    async fn exhausted_ladder_is_none_and_scan_still_runs() {
        let page = FixturePage::new("<html><body><p>nothing here</p></body></html>");
        let found = first_matching_selector(
            &page,
            &candidates(&["div.content-a", "div.content-b"]),
            Duration::ZERO,
        )
        .await
        .unwrap();
        assert!(found.is_none());

        let html = page.content().await.unwrap();
        let suspects = scan_for_content_hints(&html);
        assert!(suspects.is_empty());
        log_content_hints(&html);
    }

    #[test]
    fn content_scan_matches_keyword_classes_case_insensitively() {
        let html = r#"
            <div class="TopStoryCard">Big news</div>
            <span class="page-footer">fine print</span>
            <h2 class="media-headline">Header text</h2>
        "#;
        let suspects = scan_for_content_hints(html);
        assert_eq!(suspects.len(), 2);
        assert_eq!(suspects[0].classes, "TopStoryCard");
        assert_eq!(suspects[0].text_preview, "Big news");
    }

    #[test]
    fn headline_scan_skips_empty_text() {
        let html = r#"
            <h2 class="headline">First headline</h2>
            <h2 class="headline">   </h2>
            <h2 class="Headline__main">Second headline</h2>
        "#;
        let headlines = scan_for_headlines(html);
        assert_eq!(headlines, vec!["First headline", "Second headline"]);
    }
}
