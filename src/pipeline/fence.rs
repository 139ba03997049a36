//! Fenced code blocks.
//!
//! Notion rejects rich-text content longer than 2000 characters, so long
//! listings are split across several consecutive `code` blocks. Windows of
//! 1900 characters leave headroom below the hard limit.

use crate::block::{Block, RichText};
use crate::pipeline::Collected;

/// Fence marker opening and closing a code block.
pub const FENCE: &str = "```";

/// Language used when the opening fence has no tag.
pub const DEFAULT_LANGUAGE: &str = "plain text";

/// Content longer than this (in characters) is split.
pub const MAX_CODE_CHARS: usize = 2000;

/// Size of each window when content is split.
pub const CHUNK_CHARS: usize = 1900;

/// `true` when a trimmed line opens a fenced code block.
pub fn is_fence(trimmed: &str) -> bool {
    trimmed.starts_with(FENCE)
}

/// Collect a fenced code block starting at `lines[start]`.
///
/// Body lines are taken verbatim up to the next line that starts with the
/// fence marker. An unterminated fence runs to the end of the document.
/// `consumed` counts both fences.
pub fn collect(lines: &[&str], start: usize) -> Collected {
    let opening = lines[start].trim();
    let language = match opening.strip_prefix(FENCE).map(str::trim) {
        Some(tag) if !tag.is_empty() => tag.to_string(),
        _ => DEFAULT_LANGUAGE.to_string(),
    };

    let body: Vec<&str> = lines[start + 1..]
        .iter()
        .take_while(|line| !line.starts_with(FENCE))
        .copied()
        .collect();
    let closed = start + 1 + body.len() < lines.len();
    let consumed = 1 + body.len() + usize::from(closed);

    let content = body.join("\n");
    let blocks = chunk(&content)
        .into_iter()
        .map(|piece| Block::Code {
            spans: if piece.is_empty() {
                Vec::new()
            } else {
                vec![RichText::plain(piece)]
            },
            language: language.clone(),
        })
        .collect();

    Collected::new(blocks, consumed)
}

/// Split code content into pieces Notion will accept.
///
/// Content within [`MAX_CODE_CHARS`] is returned whole (even when empty);
/// longer content is cut into [`CHUNK_CHARS`] windows on character
/// boundaries.
pub fn chunk(content: &str) -> Vec<String> {
    if content.chars().count() <= MAX_CODE_CHARS {
        return vec![content.to_string()];
    }

    let chars: Vec<char> = content.chars().collect();
    chars
        .chunks(CHUNK_CHARS)
        .map(|window| window.iter().collect())
        .collect()
}
