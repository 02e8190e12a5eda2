//! Record types produced by the site scrapers.
//!
//! These are transient, run-local values: nothing here carries identity, gets
//! deduplicated, or outlives a single invocation's output.

use serde::{Deserialize, Serialize};

/// One news-list entry: a headline plus its displayed timestamp.
///
/// The timestamp is kept as the opaque string the site rendered
/// (e.g. "12 minutes ago" or "8:03 AM EDT"); no date parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub title: String,
    pub timestamp: String,
}

/// One quotation from the quotes demo site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
}
