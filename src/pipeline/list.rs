//! Bullet and numbered lists.
//!
//! Only flat lists are supported: indentation is trimmed away, so a nested
//! item becomes a sibling of its parent.

use crate::block::Block;
use crate::pipeline::{inline, Collected};
use once_cell::sync::Lazy;
use regex::Regex;

static RE_ORDERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s+").unwrap());

static RE_UNORDERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[*+-]\s+").unwrap());

/// Which kind of list marker to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `1.`, `2.`, …
    Ordered,
    /// `*`, `-` or `+`, freely mixed.
    Unordered,
}

impl ListKind {
    fn marker(self) -> &'static Regex {
        match self {
            ListKind::Ordered => &RE_ORDERED,
            ListKind::Unordered => &RE_UNORDERED,
        }
    }

    /// `true` when the trimmed line starts with this kind's marker.
    pub fn matches(self, trimmed: &str) -> bool {
        self.marker().is_match(trimmed)
    }

    fn item(self, spans: Vec<crate::block::RichText>) -> Block {
        match self {
            ListKind::Ordered => Block::NumberedItem { spans },
            ListKind::Unordered => Block::BulletItem { spans },
        }
    }
}

/// Collect consecutive list items of one kind starting at `lines[start]`.
///
/// Items whose text is empty after tokenization are skipped without ending
/// the list. The run ends at the first line without a matching marker.
pub fn collect(lines: &[&str], start: usize, kind: ListKind) -> Collected {
    let marker = kind.marker();
    let mut blocks = Vec::new();
    let mut consumed = 0;

    for line in &lines[start..] {
        let trimmed = line.trim();
        let Some(found) = marker.find(trimmed) else {
            break;
        };
        consumed += 1;

        let spans = inline::tokenize(&trimmed[found.end()..]);
        if !spans.is_empty() {
            blocks.push(kind.item(spans));
        }
    }

    Collected::new(blocks, consumed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{RichText, Style};
    use pretty_assertions::assert_eq;

    #[test]
    fn unordered_items_with_mixed_markers() {
        let lines = ["* Item with asterisk", "- Item with dash", "+ Item with plus"];
        let got = collect(&lines, 0, ListKind::Unordered);
        assert_eq!(got.consumed, 3);
        assert_eq!(
            got.blocks,
            vec![
                Block::BulletItem {
                    spans: vec![RichText::plain("Item with asterisk")]
                },
                Block::BulletItem {
                    spans: vec![RichText::plain("Item with dash")]
                },
                Block::BulletItem {
                    spans: vec![RichText::plain("Item with plus")]
                },
            ]
        );
    }

    #[test]
    fn ordered_items_stop_at_non_item() {
        let lines = ["1. First", "2. **Second**", "Not an item", "3. Third"];
        let got = collect(&lines, 0, ListKind::Ordered);
        assert_eq!(got.consumed, 2);
        assert_eq!(
            got.blocks,
            vec![
                Block::NumberedItem {
                    spans: vec![RichText::plain("First")]
                },
                Block::NumberedItem {
                    spans: vec![RichText::styled("Second", Style::BOLD)]
                },
            ]
        );
    }

    #[test]
    fn blank_items_are_skipped_but_do_not_end_the_list() {
        // The image is stripped, leaving the middle item empty.
        let lines = ["- First item", "- ![img](a.png)", "- Third item"];
        let got = collect(&lines, 0, ListKind::Unordered);
        assert_eq!(got.consumed, 3);
        assert_eq!(got.blocks.len(), 2);
        assert_eq!(got.blocks[0].plain_text(), "First item");
        assert_eq!(got.blocks[1].plain_text(), "Third item");
    }

    #[test]
    fn indented_items_are_flattened() {
        let lines = ["- Parent", "  - Child", "- Sibling"];
        let got = collect(&lines, 0, ListKind::Unordered);
        assert_eq!(got.consumed, 3);
        assert_eq!(got.blocks.len(), 3);
        assert_eq!(got.blocks[1].plain_text(), "Child");
    }

    #[test]
    fn other_kind_ends_the_run() {
        let lines = ["- bullet", "1. number"];
        assert_eq!(collect(&lines, 0, ListKind::Unordered).consumed, 1);
        assert!(!ListKind::Ordered.matches("-item"));
        assert!(ListKind::Ordered.matches("10. ten"));
    }
}
