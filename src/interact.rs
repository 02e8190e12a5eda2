//! Bounded page interaction: scrolling, load-more clicks, consent dismissal.
//!
//! Nothing here verifies that new content actually arrived; every pause is a
//! fixed heuristic delay. The loops are bounded on both axes (scroll rounds
//! and a separate click budget) so a stubborn page can never hang a run.

use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::SiteConfig;
use crate::error::ScrapeResult;
use crate::page::PageDriver;

/// What a scroll/click pass actually did.
#[derive(Debug, PartialEq, Eq)]
pub struct InteractionSummary {
    pub scrolls: u32,
    pub load_more_clicks: u32,
}

/// Scroll to the bottom up to `max_scrolls` times, probing for a load-more
/// control after each scroll while the click budget lasts.
///
/// The click budget is independent of the scroll count: once `max_clicks` is
/// spent, scrolling continues without probing. A control that resolves but
/// is not clickable is treated exactly like an absent one, and the loop just
/// moves on to the next scroll round.
pub async fn scroll_and_load_more<D: PageDriver>(
    page: &D,
    cfg: &SiteConfig,
) -> ScrapeResult<InteractionSummary> {
    let mut clicks = 0u32;

    for round in 0..cfg.max_scrolls {
        page.scroll_to_bottom().await?;
        sleep(cfg.scroll_delay).await;
        debug!(round = round + 1, total = cfg.max_scrolls, "scroll complete");

        if clicks >= cfg.max_clicks {
            continue;
        }

        for selector in &cfg.load_more_selectors {
            if !page.wait_for_selector(selector, cfg.probe_timeout).await? {
                continue;
            }
            if page.click_if_clickable(selector).await? {
                clicks += 1;
                info!(%selector, clicks, "clicked load-more control");
                sleep(cfg.post_click_delay).await;
                break;
            }
            // Present but hidden or disabled: same as not found.
        }
    }

    info!(
        scrolls = cfg.max_scrolls,
        load_more_clicks = clicks,
        "finished scroll/load-more pass"
    );
    Ok(InteractionSummary {
        scrolls: cfg.max_scrolls,
        load_more_clicks: clicks,
    })
}

/// One pass over the consent-button ladder: click the first control that is
/// present and clickable, then give the page a moment to settle.
///
/// Returns whether anything was dismissed. Finding nothing is normal; the
/// banner may simply not be shown.
pub async fn dismiss_consent<D: PageDriver>(page: &D, cfg: &SiteConfig) -> ScrapeResult<bool> {
    for selector in &cfg.consent_selectors {
        if !page.wait_for_selector(selector, cfg.probe_timeout).await? {
            continue;
        }
        if page.click_if_clickable(selector).await? {
            info!(%selector, "dismissed consent control");
            sleep(cfg.post_click_delay).await;
            return Ok(true);
        }
    }
    debug!("no consent control found");
    Ok(false)
}
