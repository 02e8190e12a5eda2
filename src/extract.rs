//! Field extraction chains over a parsed document.
//!
//! Extraction descends a fixed sequence of nested single-element lookups.
//! Every hop is independently nullable: a missing intermediate aborts the
//! record being built (with a log line naming the hop), never the batch.
//! Leaf text is whitespace-trimmed and otherwise left opaque.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

/// First element matching `selector` inside `scope`, if any.
///
/// A selector that fails to parse behaves like one that matches nothing;
/// selector strings are fixed per site, so this only fires on a typo.
pub fn select_one<'a>(scope: ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    match Selector::parse(selector) {
        Ok(sel) => scope.select(&sel).next(),
        Err(e) => {
            warn!(%selector, error = %e, "unparseable selector");
            None
        }
    }
}

/// Descend `steps` one nested lookup at a time from `scope`.
///
/// Returns the leaf element, or `None` at the first hop that fails to
/// resolve (logged with its index).
pub fn descend<'a>(scope: ElementRef<'a>, steps: &[&str]) -> Option<ElementRef<'a>> {
    let mut current = scope;
    for (hop, step) in steps.iter().enumerate() {
        match select_one(current, step) {
            Some(next) => current = next,
            None => {
                debug!(hop = hop + 1, selector = %step, "extraction chain broke");
                return None;
            }
        }
    }
    Some(current)
}

/// Trimmed text content of an element, with descendant text joined by
/// single spaces.
pub fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// `descend` straight to trimmed leaf text.
pub fn chain_text(scope: ElementRef<'_>, steps: &[&str]) -> Option<String> {
    descend(scope, steps).map(text_of)
}

/// Cell texts of the first `<table>` in the document, one `Vec<String>` per
/// row, header and body rows alike, in document order.
pub fn table_rows(html: &str) -> Option<Vec<Vec<String>>> {
    let document = Html::parse_document(html);
    let table_sel = Selector::parse("table").unwrap();
    let row_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("td, th").unwrap();

    let table = document.select(&table_sel).next()?;
    let rows = table
        .select(&row_sel)
        .map(|row| row.select(&cell_sel).map(text_of).collect::<Vec<_>>())
        .collect();
    Some(rows)
}
