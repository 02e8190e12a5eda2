//! Error taxonomy for the scraper pipelines.
//!
//! Failures that abort a run (navigation, browser launch, I/O) surface as
//! [`ScrapeError`]; per-record extraction misses never do, they are logged
//! and skipped at the call site.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// DevTools protocol failure while driving the browser.
    #[error("browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    /// Chromium could not be launched or configured.
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// HTTP fetch failure for the non-browser sites.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A target URL did not parse.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// PDF assembly or serialization failure.
    #[error("pdf error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// The site interposed a bot-verification page and the grace wait
    /// expired without it clearing.
    #[error("blocked by a bot-verification wall")]
    BotWall,
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
