//! Command-line interface definitions.

use clap::{Parser, ValueEnum};

/// Which target site to scrape. One site per invocation; nothing carries
/// over between runs.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Site {
    /// quotes.toscrape.com demo page (plain HTTP)
    Quotes,
    /// Berkeley graduate program listing
    GradPrograms,
    /// Bloomberg "Latest News" listing
    LatestNews,
    /// HKTVmall product search
    Retail,
    /// YouTube channel video listing
    Videos,
    /// Yahoo Finance crypto table
    Markets,
}

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Print quotes to the console
/// page_harvest quotes
///
/// # Scrape the news listing and write the PDF report
/// page_harvest latest-news --pdf -o ./out
///
/// # Watch the browser work
/// page_harvest retail --headed
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Site to scrape
    #[arg(value_enum)]
    pub site: Site,

    /// Directory for file artifacts (CSV, PDF)
    #[arg(short, long, default_value = "./out")]
    pub output_dir: String,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headed: bool,

    /// Write the PDF report (latest-news only)
    #[arg(long)]
    pub pdf: bool,
}

impl Site {
    /// Whether this site needs a browser session, as opposed to a plain
    /// HTTP fetch.
    pub fn needs_browser(self) -> bool {
        !matches!(self, Site::Quotes)
    }

    /// Whether the scraper writes a file artifact for this invocation.
    pub fn writes_files(self, pdf: bool) -> bool {
        match self {
            Site::Markets => true,
            Site::LatestNews => pdf,
            _ => false,
        }
    }
}
