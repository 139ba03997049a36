//! Inline rich-text tokenizer: turn a line (or joined paragraph) of Markdown
//! into styled [`RichText`] spans.
//!
//! ## Two phases
//!
//! 1. **Structural stripping.** Images, image-links, anchor links and
//!    relative-path links are deleted outright, in a fixed order, before any
//!    span splitting happens. Notion cannot display them and a dangling
//!    `[label](./x)` would otherwise reach the link sanitiser as a label.
//!    Whitespace runs are then collapsed to a single space.
//! 2. **Span splitting.** A left-to-right scanner tries the [`DELIMITERS`]
//!    table at every position; the first delimiter that matches wins and the
//!    scanner resumes after it. Text between matches becomes plain spans.
//!
//! There is no escape mechanism: an unbalanced `*`, `` ` `` or `[` is kept as
//! a literal character in the surrounding plain span.

use crate::block::{RichText, Style};
use crate::pipeline::link;
use once_cell::sync::Lazy;
use regex::Regex;

// ── Phase 1: structural stripping ────────────────────────────────────────────

static RE_IMAGE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[!\[[^\]]*\]\([^)]*\)\]\([^)]*\)").unwrap());

static RE_IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap());

static RE_ANCHOR_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]+\]\(#[^)]*\)").unwrap());

/// `./x`, `../x` and root-relative `/x` targets.
static RE_RELATIVE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]+\]\(\.{0,2}/[^)]*\)").unwrap());

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Remove syntax Notion cannot represent and normalise whitespace.
///
/// Order matters: the image-link pattern must run before the plain image
/// pattern, or the inner image would be removed first and leave `[](url)`.
pub fn strip_structural(text: &str) -> String {
    let s = RE_IMAGE_LINK.replace_all(text, "");
    let s = RE_IMAGE.replace_all(&s, "");
    let s = RE_ANCHOR_LINK.replace_all(&s, "");
    let s = RE_RELATIVE_LINK.replace_all(&s, "");
    RE_WHITESPACE.replace_all(&s, " ").trim().to_string()
}

// ── Phase 2: span splitting ──────────────────────────────────────────────────

/// Inline delimiters recognised by the span scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `**text**`, text without `*`.
    Bold,
    /// `*text*`, text without `*`.
    Italic,
    /// `` `text` ``, text without a backtick.
    Code,
    /// `[label](url)`, label without `]`, url without `)`.
    Link,
}

/// Delimiter priority. At a given position the first entry that matches wins.
pub const DELIMITERS: [Delimiter; 4] = [
    Delimiter::Bold,
    Delimiter::Italic,
    Delimiter::Code,
    Delimiter::Link,
];

/// A delimiter match at the start of a slice.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Styled(&'a str, Style),
    Link { label: &'a str, url: &'a str },
}

impl Delimiter {
    /// Try to match this delimiter at the very start of `s`.
    ///
    /// Returns the token and the number of bytes it spans.
    fn match_at(self, s: &str) -> Option<(Token<'_>, usize)> {
        match self {
            Delimiter::Bold => {
                enclosed(s, "**", '*', "**").map(|(c, n)| (Token::Styled(c, Style::BOLD), n))
            }
            Delimiter::Italic => {
                enclosed(s, "*", '*', "*").map(|(c, n)| (Token::Styled(c, Style::ITALIC), n))
            }
            Delimiter::Code => {
                enclosed(s, "`", '`', "`").map(|(c, n)| (Token::Styled(c, Style::CODE), n))
            }
            Delimiter::Link => {
                let (label, head) = enclosed(s, "[", ']', "](")?;
                let rest = &s[head..];
                let len = rest.find(')')?;
                if len == 0 {
                    return None;
                }
                Some((
                    Token::Link {
                        label,
                        url: &rest[..len],
                    },
                    head + len + 1,
                ))
            }
        }
    }
}

/// Match `open`, a non-empty run of characters up to the first `stop`, then
/// `close` (which must begin at that `stop`).
fn enclosed<'a>(s: &'a str, open: &str, stop: char, close: &str) -> Option<(&'a str, usize)> {
    let rest = s.strip_prefix(open)?;
    let len = rest.find(stop)?;
    if len == 0 || !rest[len..].starts_with(close) {
        return None;
    }
    Some((&rest[..len], open.len() + len + close.len()))
}

impl Token<'_> {
    fn into_span(self) -> Option<RichText> {
        let span = match self {
            Token::Styled(content, style) => RichText::styled(content, style),
            Token::Link { label, url } => match link::sanitize(url) {
                Some(url) => RichText::link(label, url),
                None => RichText::plain(label),
            },
        };
        (!span.content.is_empty()).then_some(span)
    }
}

/// Characters that can open a delimiter; every other position is skipped.
fn may_open(c: char) -> bool {
    matches!(c, '*' | '`' | '[')
}

/// Split already-stripped text into spans.
pub fn split_spans(text: &str) -> Vec<RichText> {
    let mut spans = Vec::new();
    let mut plain_start = 0;
    let mut pos = 0;

    while let Some(c) = text[pos..].chars().next() {
        let matched = if may_open(c) {
            let rest = &text[pos..];
            DELIMITERS.iter().find_map(|d| d.match_at(rest))
        } else {
            None
        };

        match matched {
            Some((token, len)) => {
                push_plain(&mut spans, &text[plain_start..pos]);
                spans.extend(token.into_span());
                pos += len;
                plain_start = pos;
            }
            None => pos += c.len_utf8(),
        }
    }

    push_plain(&mut spans, &text[plain_start..]);
    spans
}

fn push_plain(spans: &mut Vec<RichText>, text: &str) {
    if !text.is_empty() {
        spans.push(RichText::plain(text));
    }
}

/// Tokenize Markdown inline content into rich-text spans.
///
/// Returns an empty vector when nothing survives structural stripping; the
/// caller must not emit a block in that case.
pub fn tokenize(text: &str) -> Vec<RichText> {
    let stripped = strip_structural(text);
    if stripped.is_empty() {
        return Vec::new();
    }
    split_spans(&stripped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_text_is_one_span() {
        assert_eq!(
            tokenize("This is a simple paragraph."),
            vec![RichText::plain("This is a simple paragraph.")]
        );
    }

    #[test]
    fn bold_italic_and_code() {
        assert_eq!(
            tokenize("This is **bold** and *italic* and `code`."),
            vec![
                RichText::plain("This is "),
                RichText::styled("bold", Style::BOLD),
                RichText::plain(" and "),
                RichText::styled("italic", Style::ITALIC),
                RichText::plain(" and "),
                RichText::styled("code", Style::CODE),
                RichText::plain("."),
            ]
        );
    }

    #[test]
    fn whitespace_between_styled_spans_is_kept() {
        assert_eq!(
            tokenize("**a** *b*"),
            vec![
                RichText::styled("a", Style::BOLD),
                RichText::plain(" "),
                RichText::styled("b", Style::ITALIC),
            ]
        );
    }

    #[test]
    fn bold_takes_priority_over_italic() {
        assert_eq!(DELIMITERS[0], Delimiter::Bold);
        assert_eq!(tokenize("**x**"), vec![RichText::styled("x", Style::BOLD)]);
    }

    #[test]
    fn half_closed_bold_falls_back_to_italic() {
        assert_eq!(
            tokenize("**x*"),
            vec![RichText::plain("*"), RichText::styled("x", Style::ITALIC)]
        );
    }

    #[test]
    fn unbalanced_delimiters_stay_literal() {
        for text in [
            "**unclosed bold",
            "*unclosed italic",
            "`unclosed code",
            "[unclosed link(missing bracket",
            "Text with * and _ and ` characters.",
            "empty ** pair",
        ] {
            assert_eq!(tokenize(text), vec![RichText::plain(text)], "{text}");
        }
    }

    #[test]
    fn code_content_is_not_restyled() {
        assert_eq!(
            tokenize("Use `a*b*c` here"),
            vec![
                RichText::plain("Use "),
                RichText::styled("a*b*c", Style::CODE),
                RichText::plain(" here"),
            ]
        );
    }

    #[test]
    fn valid_link_keeps_url() {
        assert_eq!(
            tokenize("Visit [Google](https://google.com) for search."),
            vec![
                RichText::plain("Visit "),
                RichText::link("Google", "https://google.com"),
                RichText::plain(" for search."),
            ]
        );
    }

    #[test]
    fn bare_domain_link_gets_https() {
        assert_eq!(
            tokenize("[Example](example.com)"),
            vec![RichText::link("Example", "https://example.com")]
        );
    }

    #[test]
    fn invalid_link_keeps_label_only() {
        for text in [
            "[Link](not-a-url)",
            "[Link](mailto:test@example.com)",
            "[Link](tel:555-1234)",
            "[Link](file:///local/file)",
        ] {
            assert_eq!(tokenize(text), vec![RichText::plain("Link")], "{text}");
        }
    }

    #[test]
    fn anchor_and_relative_links_are_removed() {
        assert_eq!(
            tokenize("Go to [section](#header) below."),
            vec![RichText::plain("Go to below.")]
        );
        assert_eq!(
            tokenize("See [docs](./docs/guide.md) or [up](../README.md) for more."),
            vec![RichText::plain("See or for more.")]
        );
    }

    #[test]
    fn root_relative_links_are_removed() {
        assert_eq!(
            tokenize("Read [x](/path) and [guide](/docs/a.md) today."),
            vec![RichText::plain("Read and today.")]
        );
        // An absolute URL containing `/` later in the target is untouched.
        assert_eq!(
            tokenize("[site](https://a.io/path)"),
            vec![RichText::link("site", "https://a.io/path")]
        );
    }

    #[test]
    fn images_and_image_links_are_removed() {
        assert_eq!(
            tokenize("Here is an image: ![alt text](image.png)"),
            vec![RichText::plain("Here is an image:")]
        );
        assert_eq!(
            tokenize("Click [![badge](badge.png)](https://example.com) here."),
            vec![RichText::plain("Click here.")]
        );
    }

    #[test]
    fn only_stripped_content_yields_nothing() {
        assert!(tokenize("![Only image](image.png)").is_empty());
        assert!(tokenize("[Only anchor](#section)").is_empty());
        assert!(tokenize("   \t ").is_empty());
    }

    #[test]
    fn whitespace_and_newlines_collapse() {
        assert_eq!(
            tokenize("Text   with     multiple\n   spaces."),
            vec![RichText::plain("Text with multiple spaces.")]
        );
    }

    #[test]
    fn unicode_is_preserved() {
        let text = "Unicode: 🚀 ✅ こんにちは **太字**";
        assert_eq!(
            tokenize(text),
            vec![
                RichText::plain("Unicode: 🚀 ✅ こんにちは "),
                RichText::styled("太字", Style::BOLD),
            ]
        );
    }

    #[test]
    fn link_url_stops_at_first_paren() {
        // `[^)]` semantics: the URL ends at the first `)`.
        assert_eq!(
            tokenize("[w](https://en.wikipedia.org/wiki/Rust_(lang))"),
            vec![
                RichText::link("w", "https://en.wikipedia.org/wiki/Rust_(lang"),
                RichText::plain(")"),
            ]
        );
    }
}
