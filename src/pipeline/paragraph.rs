//! Paragraph aggregation.
//!
//! Consecutive plain lines form one paragraph. A line ends the paragraph
//! when it is blank or would start another block. Headings deeper than H3
//! do not interrupt a paragraph and are absorbed as text.

use crate::block::Block;
use crate::pipeline::list::ListKind;
use crate::pipeline::{fence, inline, marker, table, Collected};

/// `true` when a trimmed line must not be merged into a running paragraph.
pub fn ends_paragraph(trimmed: &str) -> bool {
    trimmed.is_empty()
        || marker::is_shallow_heading(trimmed)
        || fence::is_fence(trimmed)
        || table::is_table_line(trimmed)
        || ListKind::Ordered.matches(trimmed)
        || ListKind::Unordered.matches(trimmed)
        || marker::quote(trimmed).is_some()
        || marker::is_rule(trimmed)
}

/// Collect the paragraph starting at `lines[start]`.
///
/// The first line is always taken. Lines are joined with `\n` and tokenized
/// as one unit; no block is produced when nothing survives tokenization.
pub fn collect(lines: &[&str], start: usize) -> Collected {
    let first = lines[start].trim();
    let following = lines[start + 1..]
        .iter()
        .map(|line| line.trim())
        .take_while(|line| !ends_paragraph(line));

    let text_lines: Vec<&str> = std::iter::once(first).chain(following).collect();
    let consumed = text_lines.len();

    let spans = inline::tokenize(&text_lines.join("\n"));
    let blocks = if spans.is_empty() {
        Vec::new()
    } else {
        vec![Block::Paragraph { spans }]
    };

    Collected::new(blocks, consumed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::RichText;
    use pretty_assertions::assert_eq;

    #[test]
    fn merges_consecutive_lines() {
        let lines = ["First line", "Second line", "Third line", "", "Next"];
        let got = collect(&lines, 0);
        assert_eq!(got.consumed, 3);
        assert_eq!(
            got.blocks,
            vec![Block::Paragraph {
                spans: vec![RichText::plain("First line Second line Third line")]
            }]
        );
    }

    #[test]
    fn stops_at_block_starts() {
        for next in [
            "# H1",
            "### H3",
            "```",
            "a | b",
            "1. item",
            "- item",
            "> quote",
            "---",
        ] {
            let lines = ["text", next];
            assert_eq!(collect(&lines, 0).consumed, 1, "{next}");
        }
    }

    #[test]
    fn deep_headings_are_absorbed() {
        let lines = ["text", "#### not a break"];
        let got = collect(&lines, 0);
        assert_eq!(got.consumed, 2);
        assert_eq!(got.blocks[0].plain_text(), "text #### not a break");
    }

    #[test]
    fn seven_hashes_is_plain_text() {
        let lines = ["####### seven", "more"];
        assert_eq!(collect(&lines, 0).consumed, 2);
    }

    #[test]
    fn empty_after_tokenize_emits_nothing() {
        let lines = ["![img](a.png)", "[anchor](#x)"];
        let got = collect(&lines, 0);
        assert_eq!(got.consumed, 2);
        assert!(got.blocks.is_empty());
    }
}
