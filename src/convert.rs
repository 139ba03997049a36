//! Block dispatcher: the entry points that turn a Markdown document into
//! Notion blocks.
//!
//! The dispatcher owns the line cursor. At each step it classifies the
//! current trimmed line, hands the span of lines to the matching collector in
//! [`crate::pipeline`], appends the returned blocks and advances by the
//! number of lines the collector reports as consumed.
//!
//! ## Precedence
//!
//! ```text
//! blank ▶ heading ▶ fence ▶ table ▶ ordered ▶ unordered ▶ quote ▶ rule ▶ paragraph
//! ```
//!
//! Conversion is a pure function of its input: no I/O, no shared state, and
//! the same input always yields the same blocks.

use crate::block::{Block, HeadingLevel, RichText};
use crate::error::ConvertError;
use crate::pipeline::list::{self, ListKind};
use crate::pipeline::{fence, inline, marker, paragraph, table, Collected};
use crate::progress::{ConversionObserver, NoopObserver};

/// Convert a Markdown document into Notion blocks, in document order.
///
/// Never fails: malformed Markdown degrades to plain text.
///
/// # Example
/// ```rust
/// use md_notion_sync::{convert, Block};
///
/// let blocks = convert("# Title\n\nSome **bold** text.");
/// assert_eq!(blocks.len(), 2);
/// assert!(matches!(blocks[1], Block::Paragraph { .. }));
/// ```
pub fn convert(markdown: &str) -> Vec<Block> {
    convert_with_observer(markdown, &NoopObserver)
}

/// Convert raw bytes, rejecting input that is not UTF-8 text.
pub fn convert_bytes(bytes: &[u8]) -> Result<Vec<Block>, ConvertError> {
    Ok(convert(decode_utf8(bytes)?))
}

/// View bytes as Markdown text.
pub fn decode_utf8(bytes: &[u8]) -> Result<&str, ConvertError> {
    std::str::from_utf8(bytes).map_err(|e| ConvertError::InvalidInput {
        expected: "UTF-8 text",
        detail: e.to_string(),
    })
}

/// [`convert`], reporting diagnostics to `observer`.
pub fn convert_with_observer(markdown: &str, observer: &dyn ConversionObserver) -> Vec<Block> {
    let lines = split_lines(markdown);
    let mut blocks = Vec::new();
    let mut cursor = 0;

    while cursor < lines.len() {
        let step = dispatch(&lines, cursor, observer);
        blocks.extend(step.blocks);
        cursor += step.consumed.max(1);
    }

    observer.on_conversion_complete(lines.len(), blocks.len());
    blocks
}

/// Split on `\n`, dropping a trailing `\r` from each line.
fn split_lines(markdown: &str) -> Vec<&str> {
    markdown
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

fn dispatch(lines: &[&str], i: usize, observer: &dyn ConversionObserver) -> Collected {
    let line = lines[i].trim();

    if line.is_empty() {
        return Collected::new(Vec::new(), 1);
    }

    if let Some((hashes, text)) = marker::heading(line) {
        let spans = inline::tokenize(text);
        return single_line(spans, |spans| Block::Heading {
            level: HeadingLevel::from_hashes(hashes),
            spans,
        });
    }

    if fence::is_fence(line) {
        return fence::collect(lines, i);
    }

    let next_is_table = lines.get(i + 1).is_some_and(|next| table::is_table_line(next));
    if table::is_table_line(line) && next_is_table {
        return collect_table(lines, i, observer);
    }

    if ListKind::Ordered.matches(line) {
        return list::collect(lines, i, ListKind::Ordered);
    }

    if ListKind::Unordered.matches(line) {
        return list::collect(lines, i, ListKind::Unordered);
    }

    if let Some(text) = marker::quote(line) {
        return single_line(inline::tokenize(text), |spans| Block::Quote { spans });
    }

    if marker::is_rule(line) {
        return Collected::new(vec![Block::Divider], 1);
    }

    paragraph::collect(lines, i)
}

/// One-line block, skipped entirely when it has no spans.
fn single_line(spans: Vec<RichText>, build: impl FnOnce(Vec<RichText>) -> Block) -> Collected {
    let blocks = if spans.is_empty() {
        Vec::new()
    } else {
        vec![build(spans)]
    };
    Collected::new(blocks, 1)
}

/// Table run starting at `i`. When the run does not parse as a table, only
/// its first line survives, as a paragraph; the rest of the run is consumed
/// and dropped.
fn collect_table(lines: &[&str], i: usize, observer: &dyn ConversionObserver) -> Collected {
    let run = table::run_length(lines, i);

    if let Some(parsed) = table::parse(&lines[i..i + run]) {
        return Collected::new(vec![Block::Table(parsed)], run);
    }

    observer.on_table_fallback(i, run - 1);
    let spans = inline::tokenize(lines[i].trim());
    let blocks = if spans.is_empty() {
        Vec::new()
    } else {
        vec![Block::Paragraph { spans }]
    };
    Collected::new(blocks, run)
}
