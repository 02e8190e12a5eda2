//! Output sinks for extracted records.
//!
//! Console printing happens inline in each scraper; the submodules here
//! cover the file artifacts:
//!
//! - [`csv`]: one row per extracted table row, written once per run
//! - [`pdf`]: a titled report with one paragraph block per story
//!
//! Both sinks preserve input order and perform no deduplication.

pub mod csv;
pub mod pdf;
