//! Small helpers for logging and file-system checks.

use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

use crate::error::ScrapeResult;

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` bytes with an ellipsis and a byte-count
/// indicator appended, so debug dumps of page fragments stay readable.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut cut = max;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then probes it with a create-and-delete
/// write test. Called before any browser work so a bad `--output-dir` fails
/// fast instead of after a full scrape.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> ScrapeResult<()> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
