//! Page acquisition and the driver seam.
//!
//! Scrapers never talk to the browser engine directly. They see a
//! [`PageDriver`]: navigate, read the title, read the full document, wait for
//! a selector with a bounded timeout, click a control if it is actually
//! clickable, and scroll to the bottom. That is the entire contract.
//!
//! Two implementations exist: [`BrowserPage`] drives a real Chromium instance
//! over CDP, and `FixturePage` (test builds only) serves a static HTML
//! fixture with a scripted click budget, so every loop in this crate can be
//! exercised deterministically without a network.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::error::{ScrapeError, ScrapeResult};

const POLL_INTERVAL_MS: u64 = 500;

const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Hides `navigator.webdriver` before any site script runs.
const STEALTH_SCRIPT: &str = r#"
Object.defineProperty(navigator, 'webdriver', {
    get: () => undefined,
});
"#;

/// The operations a scraper may ask of a loaded page.
#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn goto(&self, url: &str) -> ScrapeResult<()>;

    async fn title(&self) -> ScrapeResult<String>;

    /// Full serialized document, handed to the HTML parser for extraction.
    async fn content(&self) -> ScrapeResult<String>;

    /// Bounded wait until `selector` matches at least one element.
    /// `Ok(false)` on timeout; timing out is a normal outcome.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> ScrapeResult<bool>;

    /// Click the first element matching `selector` if it is visible and
    /// enabled. A found-but-not-clickable control reports `Ok(false)`,
    /// exactly like an absent one.
    async fn click_if_clickable(&self, selector: &str) -> ScrapeResult<bool>;

    async fn scroll_to_bottom(&self) -> ScrapeResult<()>;
}

/// A scraping session owning the browser process, its CDP event loop, and
/// one page.
///
/// The session is scoped to a single scraper invocation. Callers must reach
/// [`BrowserSession::close`] on every exit path, success or failure, so no
/// Chromium process outlives the run.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: BrowserPage,
}

impl BrowserSession {
    /// Launch Chromium and open a single blank page.
    ///
    /// Launch failure is fatal to the invocation; there is no retry.
    pub async fn launch(headed: bool) -> ScrapeResult<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(1920, 1080)
            .arg("--disable-blink-features=AutomationControlled")
            .arg(format!("--user-agent={DESKTOP_USER_AGENT}"));
        if headed {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(ScrapeError::Launch)?;

        let (browser, mut handler) = Browser::launch(config).await?;
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!(error = %e, "browser event loop error");
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(
            STEALTH_SCRIPT.to_string(),
        ))
        .await?;

        info!(headed, "browser session started");
        Ok(BrowserSession {
            browser,
            handler_task,
            page: BrowserPage { page },
        })
    }

    pub fn page(&self) -> &BrowserPage {
        &self.page
    }

    /// Shut the browser down and stop the CDP event loop.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "browser close failed");
        }
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        info!("browser session closed");
    }
}

/// [`PageDriver`] over a live chromiumoxide page.
pub struct BrowserPage {
    page: chromiumoxide::Page,
}

#[async_trait]
impl PageDriver for BrowserPage {
    async fn goto(&self, url: &str) -> ScrapeResult<()> {
        let url = Url::parse(url)?;
        self.page.goto(url.as_str()).await?;
        self.page.wait_for_navigation().await?;
        debug!(%url, "navigation complete");
        Ok(())
    }

    async fn title(&self) -> ScrapeResult<String> {
        Ok(self.page.get_title().await?.unwrap_or_default())
    }

    async fn content(&self) -> ScrapeResult<String> {
        Ok(self.page.content().await?)
    }

    // Selector waits are JS polling rather than a CDP primitive; the
    // protocol has no stable wait-for-selector surface.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> ScrapeResult<bool> {
        let attempts = (timeout.as_millis() as u64 / POLL_INTERVAL_MS).max(1);
        let script = format!(
            r#"(async () => {{
                for (let i = 0; i < {attempts}; i++) {{
                    let el = null;
                    try {{ el = document.querySelector({sel}); }} catch (e) {{ return false; }}
                    if (el !== null) {{ return true; }}
                    await new Promise(r => setTimeout(r, {POLL_INTERVAL_MS}));
                }}
                return false;
            }})()"#,
            sel = js_string(selector),
        );
        let value = self.page.evaluate(script).await?;
        Ok(value.into_value::<bool>().unwrap_or(false))
    }

    async fn click_if_clickable(&self, selector: &str) -> ScrapeResult<bool> {
        let script = format!(
            r#"(() => {{
                let el = null;
                try {{ el = document.querySelector({sel}); }} catch (e) {{ return false; }}
                if (el === null) {{ return false; }}
                if (el.offsetParent === null || el.disabled) {{ return false; }}
                el.scrollIntoView({{ block: 'center' }});
                el.click();
                return true;
            }})()"#,
            sel = js_string(selector),
        );
        let value = self.page.evaluate(script).await?;
        Ok(value.into_value::<bool>().unwrap_or(false))
    }

    async fn scroll_to_bottom(&self) -> ScrapeResult<()> {
        self.page
            .evaluate("window.scrollTo(0, document.documentElement.scrollHeight);")
            .await?;
        Ok(())
    }
}

/// Quote a selector as a JS string literal for interpolation into scripts.
fn js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Title heuristic for interstitial bot walls.
pub fn looks_like_bot_wall(title: &str) -> bool {
    let t = title.to_lowercase();
    t.contains("robot") || t.contains("captcha")
}

/// Check for a bot wall and give a human one grace period to clear it.
///
/// If the page title still matches the heuristic after the wait, the scraper
/// exits early with [`ScrapeError::BotWall`]. The caller's session scope
/// still releases the browser.
pub async fn pass_bot_wall<D: PageDriver>(page: &D, grace: Duration) -> ScrapeResult<()> {
    let title = page.title().await?;
    debug!(%title, "page title");
    if !looks_like_bot_wall(&title) {
        return Ok(());
    }

    warn!(
        %title,
        grace_secs = grace.as_secs(),
        "bot detection page; waiting for manual intervention"
    );
    sleep(grace).await;

    let title = page.title().await?;
    if looks_like_bot_wall(&title) {
        error!(%title, "still on bot detection page after grace period");
        return Err(ScrapeError::BotWall);
    }
    info!("bot wall cleared");
    Ok(())
}

#[cfg(test)]
pub use fixture::FixturePage;

#[cfg(test)]
mod fixture {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use scraper::{Html, Selector};

    use crate::error::ScrapeResult;
    use crate::page::PageDriver;

    /// [`PageDriver`] backed by a static HTML string.
    ///
    /// Waits return immediately based on the fixture's contents; clicks are
    /// served from a scripted per-selector budget so tests can pin down
    /// exactly how many interactions a loop performs.
    pub struct FixturePage {
        html: String,
        title: String,
        click_budget: Mutex<HashMap<String, usize>>,
        clicks_performed: AtomicUsize,
    }

    impl FixturePage {
        pub fn new(html: impl Into<String>) -> Self {
            FixturePage {
                html: html.into(),
                title: String::new(),
                click_budget: Mutex::new(HashMap::new()),
                clicks_performed: AtomicUsize::new(0),
            }
        }

        pub fn with_title(mut self, title: impl Into<String>) -> Self {
            self.title = title.into();
            self
        }

        /// Allow `selector` to be successfully clicked `count` times. Once
        /// the budget is spent the control still resolves but reports
        /// not-clickable.
        pub fn with_clickable(self, selector: impl Into<String>, count: usize) -> Self {
            self.click_budget
                .lock()
                .unwrap()
                .insert(selector.into(), count);
            self
        }

        pub fn clicks_performed(&self) -> usize {
            self.clicks_performed.load(Ordering::SeqCst)
        }
    }

    fn matches_fixture(html: &str, selector: &str) -> bool {
        let Ok(sel) = Selector::parse(selector) else {
            return false;
        };
        Html::parse_document(html).select(&sel).next().is_some()
    }

    #[async_trait]
    impl PageDriver for FixturePage {
        async fn goto(&self, _url: &str) -> ScrapeResult<()> {
            Ok(())
        }

        async fn title(&self) -> ScrapeResult<String> {
            Ok(self.title.clone())
        }

        async fn content(&self) -> ScrapeResult<String> {
            Ok(self.html.clone())
        }

        async fn wait_for_selector(
            &self,
            selector: &str,
            _timeout: Duration,
        ) -> ScrapeResult<bool> {
            Ok(matches_fixture(&self.html, selector))
        }

        async fn click_if_clickable(&self, selector: &str) -> ScrapeResult<bool> {
            let mut budget = self.click_budget.lock().unwrap();
            match budget.get_mut(selector) {
                Some(remaining) if *remaining > 0 => {
                    *remaining -= 1;
                    self.clicks_performed.fetch_add(1, Ordering::SeqCst);
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        async fn scroll_to_bottom(&self) -> ScrapeResult<()> {
            Ok(())
        }
    }
}
