//! CSV artifact writer.
//!
//! Minimal RFC-4180-style output: fields are quoted only when they contain
//! the separator, a quote, or a line break, and embedded quotes are doubled.
//! The whole file is built in memory and written once; a run produces at
//! most one table.

use std::path::Path;

use tokio::fs;
use tracing::{info, instrument};

use crate::error::ScrapeResult;

/// Quote `field` if it needs it.
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render one row, without the trailing newline.
pub fn format_row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Write `rows` to `path` as CSV, one line per row, in input order.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = rows.len()))]
pub async fn write_rows(path: &Path, rows: &[Vec<String>]) -> ScrapeResult<()> {
    let mut contents = String::new();
    for row in rows {
        contents.push_str(&format_row(row));
        contents.push('\n');
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    fs::write(path, contents).await?;
    info!("wrote CSV file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn plain_fields_are_not_quoted() {
        assert_eq!(format_row(&row(&["BTC-USD", "Bitcoin"])), "BTC-USD,Bitcoin");
    }

    #[test]
    fn fields_with_separators_and_quotes_are_escaped() {
        assert_eq!(format_row(&row(&["64,021.55"])), "\"64,021.55\"");
        assert_eq!(
            format_row(&row(&[r#"the "halving" event"#])),
            r#""the ""halving"" event""#
        );
        assert_eq!(format_row(&row(&["line\nbreak"])), "\"line\nbreak\"");
    }

    #[tokio::test]
    async fn writes_one_line_per_row_in_order() {
        let path = std::env::temp_dir().join("page_harvest_csv_test/out.csv");
        let rows = vec![
            row(&["Symbol", "Price"]),
            row(&["BTC-USD", "64,021.55"]),
            row(&["ETH-USD", "3112.04"]),
        ];
        write_rows(&path, &rows).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Symbol,Price");
        assert_eq!(lines[1], "BTC-USD,\"64,021.55\"");
        assert_eq!(lines[2], "ETH-USD,3112.04");

        let _ = std::fs::remove_dir_all(std::env::temp_dir().join("page_harvest_csv_test"));
    }
}
