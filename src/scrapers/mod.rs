//! Site-specific scrapers, one module per target.
//!
//! Every module follows the same linear pipeline: acquire the page, wait on
//! an ordered candidate selector list, optionally scroll/click for more
//! content, extract text through fixed nested selector chains, and emit the
//! records (console always, plus a CSV or PDF artifact where the site calls
//! for one).
//!
//! | Module | Target | Acquisition | Output |
//! |--------|--------|-------------|--------|
//! | [`quotes`] | quotes.toscrape.com | HTTP GET | console |
//! | [`grad_programs`] | Berkeley program list | browser | console |
//! | [`latest_news`] | Bloomberg latest | browser | console + optional PDF |
//! | [`retail`] | HKTVmall search | browser | console |
//! | [`videos`] | YouTube channel videos | browser | console |
//! | [`markets`] | Yahoo Finance crypto table | browser | CSV |
//!
//! Scrapers are independent; no module calls another, and nothing survives a
//! run beyond its printed or written output. Extraction is split into pure
//! `parse_*` functions over the document text so the selector knowledge is
//! exercised against fixture HTML in each module's tests.

pub mod grad_programs;
pub mod latest_news;
pub mod markets;
pub mod quotes;
pub mod retail;
pub mod videos;
