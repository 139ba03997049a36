//! Output data model: Notion blocks and rich-text spans.
//!
//! A [`Block`] is one structural unit of the converted document. The payload
//! shape of every variant is fixed at compile time; the Notion wire format,
//! where a block's payload key equals its `type` string, is produced only at
//! serialisation time by the hand-written [`Serialize`] impls below.
//!
//! ```text
//! Block::Paragraph { spans }
//!   ──serialize──▶ {"object":"block","type":"paragraph","paragraph":{"rich_text":[…]}}
//! ```

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

// ── Rich text ────────────────────────────────────────────────────────────────

/// Inline style flags carried by a [`RichText`] span.
///
/// Serialises as a Notion `annotations` object listing only the flags that
/// are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Style {
    #[serde(skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub code: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl Style {
    pub const PLAIN: Style = Style {
        bold: false,
        italic: false,
        code: false,
    };
    pub const BOLD: Style = Style {
        bold: true,
        italic: false,
        code: false,
    };
    pub const ITALIC: Style = Style {
        bold: false,
        italic: true,
        code: false,
    };
    pub const CODE: Style = Style {
        bold: false,
        italic: false,
        code: true,
    };

    /// `true` when no flag is set.
    pub fn is_plain(&self) -> bool {
        *self == Style::PLAIN
    }
}

/// A contiguous run of text with uniform style and link attributes.
///
/// Spans with empty `content` are never produced by the converter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RichText {
    pub content: String,
    pub style: Style,
    /// Sanitised absolute URL, when the span is a hyperlink.
    pub link: Option<String>,
}

impl RichText {
    /// Unstyled span.
    pub fn plain(content: impl Into<String>) -> Self {
        Self::styled(content, Style::PLAIN)
    }

    pub fn styled(content: impl Into<String>, style: Style) -> Self {
        Self {
            content: content.into(),
            style,
            link: None,
        }
    }

    /// Unstyled hyperlink span.
    pub fn link(content: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style: Style::PLAIN,
            link: Some(url.into()),
        }
    }
}

#[derive(Serialize)]
struct TextWire<'a> {
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<LinkWire<'a>>,
}

#[derive(Serialize)]
struct LinkWire<'a> {
    url: &'a str,
}

impl Serialize for RichText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", "text")?;
        map.serialize_entry(
            "text",
            &TextWire {
                content: &self.content,
                link: self.link.as_deref().map(|url| LinkWire { url }),
            },
        )?;
        if !self.style.is_plain() {
            map.serialize_entry("annotations", &self.style)?;
        }
        map.end()
    }
}

// ── Blocks ───────────────────────────────────────────────────────────────────

/// Heading depth. Markdown levels 4–6 are folded into [`HeadingLevel::H3`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Map a count of leading `#` characters to a heading level.
    pub fn from_hashes(count: usize) -> Self {
        match count {
            0 | 1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }
}

/// One table row: one span sequence per cell.
pub type Row = Vec<Vec<RichText>>;

/// Payload of a [`Block::Table`].
///
/// Data rows are kept exactly as parsed; they may be shorter or longer than
/// the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: Row,
    pub rows: Vec<Row>,
}

impl Table {
    /// Number of columns, defined by the header row.
    pub fn column_count(&self) -> usize {
        self.header.len()
    }
}

/// A structural unit of the converted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: HeadingLevel,
        spans: Vec<RichText>,
    },
    Paragraph {
        spans: Vec<RichText>,
    },
    Code {
        spans: Vec<RichText>,
        language: String,
    },
    BulletItem {
        spans: Vec<RichText>,
    },
    NumberedItem {
        spans: Vec<RichText>,
    },
    Quote {
        spans: Vec<RichText>,
    },
    Divider,
    Table(Table),
}

/// Discriminant of a [`Block`], named after the Notion block type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    Code,
    BulletedListItem,
    NumberedListItem,
    Quote,
    Divider,
    Table,
}

impl BlockKind {
    /// The Notion `type` string, which is also the payload key.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Heading1 => "heading_1",
            BlockKind::Heading2 => "heading_2",
            BlockKind::Heading3 => "heading_3",
            BlockKind::Paragraph => "paragraph",
            BlockKind::Code => "code",
            BlockKind::BulletedListItem => "bulleted_list_item",
            BlockKind::NumberedListItem => "numbered_list_item",
            BlockKind::Quote => "quote",
            BlockKind::Divider => "divider",
            BlockKind::Table => "table",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Heading { level, .. } => match level {
                HeadingLevel::H1 => BlockKind::Heading1,
                HeadingLevel::H2 => BlockKind::Heading2,
                HeadingLevel::H3 => BlockKind::Heading3,
            },
            Block::Paragraph { .. } => BlockKind::Paragraph,
            Block::Code { .. } => BlockKind::Code,
            Block::BulletItem { .. } => BlockKind::BulletedListItem,
            Block::NumberedItem { .. } => BlockKind::NumberedListItem,
            Block::Quote { .. } => BlockKind::Quote,
            Block::Divider => BlockKind::Divider,
            Block::Table(_) => BlockKind::Table,
        }
    }

    /// The span sequence of text-bearing blocks; `None` for dividers and tables.
    pub fn spans(&self) -> Option<&[RichText]> {
        match self {
            Block::Heading { spans, .. }
            | Block::Paragraph { spans }
            | Block::Code { spans, .. }
            | Block::BulletItem { spans }
            | Block::NumberedItem { spans }
            | Block::Quote { spans } => Some(spans),
            Block::Divider | Block::Table(_) => None,
        }
    }

    /// Concatenated span contents, ignoring style. Empty for dividers and tables.
    pub fn plain_text(&self) -> String {
        self.spans()
            .map(|spans| spans.iter().map(|s| s.content.as_str()).collect())
            .unwrap_or_default()
    }
}

#[derive(Serialize)]
struct RichTextBody<'a> {
    rich_text: &'a [RichText],
}

#[derive(Serialize)]
struct CodeBody<'a> {
    rich_text: &'a [RichText],
    language: &'a str,
}

#[derive(Serialize)]
struct EmptyBody {}

#[derive(Serialize)]
struct TableBody<'a> {
    table_width: usize,
    has_column_header: bool,
    has_row_header: bool,
    children: Vec<TableRowWire<'a>>,
}

#[derive(Serialize)]
struct TableRowWire<'a> {
    object: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    table_row: CellsWire<'a>,
}

#[derive(Serialize)]
struct CellsWire<'a> {
    cells: &'a Row,
}

impl<'a> TableRowWire<'a> {
    fn new(cells: &'a Row) -> Self {
        Self {
            object: "block",
            kind: "table_row",
            table_row: CellsWire { cells },
        }
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = self.kind().as_str();
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("object", "block")?;
        map.serialize_entry("type", kind)?;
        match self {
            Block::Heading { spans, .. }
            | Block::Paragraph { spans }
            | Block::BulletItem { spans }
            | Block::NumberedItem { spans }
            | Block::Quote { spans } => {
                map.serialize_entry(kind, &RichTextBody { rich_text: spans })?
            }
            Block::Code { spans, language } => map.serialize_entry(
                kind,
                &CodeBody {
                    rich_text: spans,
                    language,
                },
            )?,
            Block::Divider => map.serialize_entry(kind, &EmptyBody {})?,
            Block::Table(table) => {
                let children = std::iter::once(&table.header)
                    .chain(table.rows.iter())
                    .map(TableRowWire::new)
                    .collect();
                map.serialize_entry(
                    kind,
                    &TableBody {
                        table_width: table.column_count(),
                        has_column_header: true,
                        has_row_header: false,
                        children,
                    },
                )?
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn heading_level_clamps_to_three() {
        assert_eq!(HeadingLevel::from_hashes(1), HeadingLevel::H1);
        assert_eq!(HeadingLevel::from_hashes(2), HeadingLevel::H2);
        assert_eq!(HeadingLevel::from_hashes(3), HeadingLevel::H3);
        assert_eq!(HeadingLevel::from_hashes(6), HeadingLevel::H3);
    }

    #[test]
    fn plain_span_omits_annotations_and_link() {
        let v = serde_json::to_value(RichText::plain("hi")).unwrap();
        assert_eq!(v, json!({"type": "text", "text": {"content": "hi"}}));
    }

    #[test]
    fn styled_span_lists_only_set_flags() {
        let v = serde_json::to_value(RichText::styled("b", Style::BOLD)).unwrap();
        assert_eq!(
            v,
            json!({"type": "text", "text": {"content": "b"}, "annotations": {"bold": true}})
        );
    }

    #[test]
    fn link_span_serialises_url() {
        let v = serde_json::to_value(RichText::link("Google", "https://google.com")).unwrap();
        assert_eq!(
            v,
            json!({"type": "text", "text": {"content": "Google", "link": {"url": "https://google.com"}}})
        );
    }

    #[test]
    fn heading_payload_key_matches_type() {
        let block = Block::Heading {
            level: HeadingLevel::H2,
            spans: vec![RichText::plain("Title")],
        };
        let v = serde_json::to_value(&block).unwrap();
        assert_eq!(
            v,
            json!({
                "object": "block",
                "type": "heading_2",
                "heading_2": {"rich_text": [{"type": "text", "text": {"content": "Title"}}]}
            })
        );
    }

    #[test]
    fn divider_has_empty_payload() {
        let v = serde_json::to_value(&Block::Divider).unwrap();
        assert_eq!(v, json!({"object": "block", "type": "divider", "divider": {}}));
    }

    #[test]
    fn code_block_carries_language() {
        let block = Block::Code {
            spans: vec![RichText::plain("x = 1")],
            language: "python".into(),
        };
        let v = serde_json::to_value(&block).unwrap();
        assert_eq!(v["code"]["language"], "python");
        assert_eq!(v["code"]["rich_text"][0]["text"]["content"], "x = 1");
    }

    #[test]
    fn table_serialises_header_then_rows() {
        let block = Block::Table(Table {
            header: vec![vec![RichText::plain("A")], vec![RichText::plain("B")]],
            rows: vec![vec![vec![RichText::plain("1")], vec![RichText::plain("2")]]],
        });
        let v = serde_json::to_value(&block).unwrap();
        assert_eq!(v["table"]["table_width"], 2);
        assert_eq!(v["table"]["has_column_header"], true);
        assert_eq!(v["table"]["has_row_header"], false);
        let children = v["table"]["children"].as_array().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0]["type"], "table_row");
        assert_eq!(children[1]["table_row"]["cells"][1][0]["text"]["content"], "2");
    }

    #[test]
    fn plain_text_concatenates_spans() {
        let block = Block::Paragraph {
            spans: vec![RichText::plain("a "), RichText::styled("b", Style::BOLD)],
        };
        assert_eq!(block.plain_text(), "a b");
        assert_eq!(Block::Divider.plain_text(), "");
    }
}
