//! PDF report writer.
//!
//! Produces a single US-Letter document: a report title, a generated-on
//! stamp, then one numbered paragraph block per story (title line plus a
//! gray "Published:" line), in input order. Built directly with lopdf using
//! the base-14 Helvetica fonts, so there is nothing to embed.

use std::path::Path;

use chrono::Local;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use tokio::fs;
use tracing::{info, instrument};

use crate::error::ScrapeResult;
use crate::models::Story;

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;

const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 12.0;
const META_SIZE: f32 = 10.0;

/// One positioned line of report text.
struct Line {
    text: String,
    size: f32,
    bold: bool,
    gray: bool,
    /// Vertical space consumed before the next line.
    advance: f32,
}

/// The numbered paragraph blocks, one per story, in input order.
///
/// Kept separate from layout so the one-block-per-record contract is
/// directly testable.
pub fn story_blocks(stories: &[Story]) -> Vec<(String, String)> {
    stories
        .iter()
        .enumerate()
        .map(|(i, story)| {
            (
                format!("{}. {}", i + 1, story.title),
                format!("Published: {}", story.timestamp),
            )
        })
        .collect()
}

/// Replace characters outside Latin-1 so the base-font encoding can
/// represent every byte we emit.
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) < 256 { c } else { '?' })
        .collect()
}

/// Single-byte Latin-1 encoding of sanitized text. The base fonts read
/// string bytes in StandardEncoding, so UTF-8 must not reach the stream.
fn latin1_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 256 { c as u8 } else { b'?' })
        .collect()
}

/// Greedy word wrap at `max_chars` per line. Words longer than a whole
/// line (unbroken URLs in headlines) are hard-split at the limit.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if word_len > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(max_chars) {
                if chunk.len() == max_chars {
                    lines.push(chunk.iter().collect());
                } else {
                    current = chunk.iter().collect();
                }
            }
            continue;
        }
        if !current.is_empty() && current.chars().count() + 1 + word_len > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn layout(report_title: &str, generated_on: &str, stories: &[Story]) -> Vec<Line> {
    let mut lines = Vec::new();

    lines.push(Line {
        text: sanitize(report_title),
        size: TITLE_SIZE,
        bold: true,
        gray: false,
        advance: 30.0,
    });
    lines.push(Line {
        text: format!("Generated on: {generated_on}"),
        size: META_SIZE,
        bold: false,
        gray: false,
        advance: 26.0,
    });

    for (title_line, meta_line) in story_blocks(stories) {
        let wrapped = wrap_text(&sanitize(&title_line), 80);
        let last = wrapped.len() - 1;
        for (i, piece) in wrapped.into_iter().enumerate() {
            lines.push(Line {
                text: piece,
                size: BODY_SIZE,
                bold: true,
                gray: false,
                advance: if i == last { 15.0 } else { 14.0 },
            });
        }
        lines.push(Line {
            text: sanitize(&meta_line),
            size: META_SIZE,
            bold: false,
            gray: true,
            advance: 22.0,
        });
    }

    lines
}

fn page_operations(lines: &[Line]) -> Vec<Operation> {
    let mut ops = vec![Operation::new("BT", vec![])];
    let mut first = true;
    for line in lines {
        let font = if line.bold { "F2" } else { "F1" };
        ops.push(Operation::new(
            "Tf",
            vec![font.into(), line.size.into()],
        ));
        if line.gray {
            ops.push(Operation::new(
                "rg",
                vec![0.5.into(), 0.5.into(), 0.5.into()],
            ));
        } else {
            ops.push(Operation::new("rg", vec![0.into(), 0.into(), 0.into()]));
        }
        if first {
            ops.push(Operation::new(
                "Td",
                vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN).into()],
            ));
            first = false;
        }
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(
                latin1_bytes(&line.text),
                StringFormat::Literal,
            )],
        ));
        ops.push(Operation::new("Td", vec![0.into(), (-line.advance).into()]));
    }
    ops.push(Operation::new("ET", vec![]));
    ops
}

/// Split lines into pages by the vertical space each line consumes.
fn paginate(lines: Vec<Line>) -> Vec<Vec<Line>> {
    let usable = PAGE_HEIGHT - 2.0 * MARGIN;
    let mut pages = Vec::new();
    let mut current = Vec::new();
    let mut used = 0.0f32;

    for line in lines {
        if used + line.advance > usable && !current.is_empty() {
            pages.push(std::mem::take(&mut current));
            used = 0.0;
        }
        used += line.advance;
        current.push(line);
    }
    if !current.is_empty() {
        pages.push(current);
    }
    pages
}

/// Write the story report to `path`.
#[instrument(level = "info", skip_all, fields(path = %path.display(), stories = stories.len()))]
pub async fn write_story_report(
    path: &Path,
    report_title: &str,
    stories: &[Story],
) -> ScrapeResult<()> {
    let generated_on = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page_lines in paginate(layout(report_title, &generated_on, stories)) {
        let content = Content {
            operations: page_operations(&page_lines),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    fs::write(path, bytes).await?;
    info!(pages = page_count, "wrote PDF report");
    Ok(())
}
