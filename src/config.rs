//! Per-site scraping policy.
//!
//! Every piece of site-specific knowledge (the target URL, the ordered
//! candidate selector lists, the wait budgets) lives in one [`SiteConfig`]
//! record so the shared resolution/interaction machinery stays policy-free.
//! Selector lists are inherently fragile; when a site redesigns, the
//! breakage is confined to the constructor for that site.

use std::time::Duration;

/// Policy record for a single target site.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Fixed target URL. Not user-configurable, matching the one-site-per-run
    /// design.
    pub target_url: String,
    /// Ordered content selectors, tried first to last. First match wins.
    pub candidate_selectors: Vec<String>,
    /// Bounded wait applied to each content candidate in turn.
    pub wait_timeout: Duration,
    /// Shorter wait used when probing for interactive controls
    /// (consent buttons, load-more buttons).
    pub probe_timeout: Duration,
    /// Fixed pause after each scroll-to-bottom.
    pub scroll_delay: Duration,
    /// Fixed pause after a successful load-more click.
    pub post_click_delay: Duration,
    /// Fixed pause after consent dismissal, before content resolution.
    pub settle_delay: Duration,
    /// Scroll iterations. Scrolling continues even after the click budget
    /// is spent.
    pub max_scrolls: u32,
    /// Independent cap on load-more clicks.
    pub max_clicks: u32,
    /// Ordered "load more" control candidates.
    pub load_more_selectors: Vec<String>,
    /// Ordered cookie/consent control candidates.
    pub consent_selectors: Vec<String>,
}

impl SiteConfig {
    fn new(target_url: &str) -> Self {
        SiteConfig {
            target_url: target_url.to_string(),
            candidate_selectors: Vec::new(),
            wait_timeout: Duration::from_secs(10),
            probe_timeout: Duration::from_secs(2),
            scroll_delay: Duration::from_secs(2),
            post_click_delay: Duration::from_secs(3),
            settle_delay: Duration::from_secs(5),
            max_scrolls: 0,
            max_clicks: 0,
            load_more_selectors: Vec::new(),
            consent_selectors: Vec::new(),
        }
    }

    /// Quotes demo site. Plain HTTP, no waits or interaction.
    pub fn quotes() -> Self {
        SiteConfig {
            candidate_selectors: vec!["div.quote".to_string()],
            ..Self::new("http://quotes.toscrape.com")
        }
    }

    /// Berkeley graduate program listing.
    pub fn grad_programs() -> Self {
        SiteConfig {
            candidate_selectors: vec!["div.program-grid".to_string()],
            wait_timeout: Duration::from_secs(15),
            max_scrolls: 3,
            ..Self::new("https://grad.berkeley.edu/admissions/choosing-your-program/list/")
        }
    }

    /// Bloomberg "Latest News" listing. The candidate ladder starts with the
    /// exact hashed class from the current markup and degrades toward generic
    /// story/article selectors.
    pub fn latest_news() -> Self {
        SiteConfig {
            candidate_selectors: vec![
                "div.Latest_storyPadding__GBJUE".to_string(),
                "[class*='Latest_storyPadding']".to_string(),
                "[class*='storyPadding']".to_string(),
                "article".to_string(),
                "[data-component='story']".to_string(),
                ".story".to_string(),
                "[class*='story']".to_string(),
                "[class*='article']".to_string(),
            ],
            wait_timeout: Duration::from_secs(5),
            probe_timeout: Duration::from_secs(2),
            max_scrolls: 6,
            max_clicks: 5,
            load_more_selectors: vec![
                "[data-testid='load-more']".to_string(),
                "[class*='load-more']".to_string(),
                "[class*='LoadMore']".to_string(),
                "[class*='show-more']".to_string(),
                "button[aria-label*='load more']".to_string(),
                "button[aria-label*='show more']".to_string(),
                ".load-more-button".to_string(),
                "#load-more".to_string(),
                "button[class*='More']".to_string(),
            ],
            consent_selectors: vec![
                "button[data-testid='accept-all']".to_string(),
                "button[id*='accept']".to_string(),
                "button[class*='accept']".to_string(),
                "button[title*='Accept']".to_string(),
                "[data-testid='cookie-accept']".to_string(),
                ".cookie-accept".to_string(),
                "#cookie-accept".to_string(),
            ],
            ..Self::new("https://www.bloomberg.com/latest")
        }
    }

    /// HKTVmall product search for "iphone". Two-candidate ladder: the outer
    /// product wrapper, then the inner info wrapper the markup sometimes
    /// renders without it.
    pub fn retail_search() -> Self {
        SiteConfig {
            candidate_selectors: vec![
                "span.product-brief-wrapper".to_string(),
                "div.info-wrapper".to_string(),
            ],
            wait_timeout: Duration::from_secs(10),
            ..Self::new("https://www.hktvmall.com/hktv/en/search_a?keyword=iphone")
        }
    }

    /// Bloomberg Originals videos on YouTube.
    pub fn channel_videos() -> Self {
        SiteConfig {
            candidate_selectors: vec!["a#video-title-link".to_string()],
            wait_timeout: Duration::from_secs(15),
            max_scrolls: 3,
            ..Self::new("https://www.youtube.com/@business/videos")
        }
    }

    /// Yahoo Finance crypto screener table.
    pub fn crypto_table() -> Self {
        SiteConfig {
            candidate_selectors: vec!["table".to_string()],
            wait_timeout: Duration::from_secs(30),
            ..Self::new("https://finance.yahoo.com/markets/crypto/all/")
        }
    }

    /// Copy of this config with every delay zeroed. Fixture tests drive the
    /// real loops without real waiting.
    #[cfg(test)]
    pub fn without_delays(mut self) -> Self {
        self.wait_timeout = Duration::ZERO;
        self.probe_timeout = Duration::ZERO;
        self.scroll_delay = Duration::ZERO;
        self.post_click_delay = Duration::ZERO;
        self.settle_delay = Duration::ZERO;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_ladders_are_ordered_most_specific_first() {
        let cfg = SiteConfig::latest_news();
        assert_eq!(cfg.candidate_selectors[0], "div.Latest_storyPadding__GBJUE");
        assert!(cfg.candidate_selectors.len() > 1);

        let cfg = SiteConfig::retail_search();
        assert_eq!(cfg.candidate_selectors[0], "span.product-brief-wrapper");
        assert_eq!(cfg.candidate_selectors[1], "div.info-wrapper");
    }

    #[test]
    fn click_budget_is_independent_of_scroll_budget() {
        let cfg = SiteConfig::latest_news();
        assert_eq!(cfg.max_scrolls, 6);
        assert_eq!(cfg.max_clicks, 5);
    }

    #[test]
    fn static_sites_have_no_interaction_budget() {
        for cfg in [SiteConfig::quotes(), SiteConfig::crypto_table()] {
            assert_eq!(cfg.max_clicks, 0);
            assert!(cfg.load_more_selectors.is_empty());
        }
    }
}
