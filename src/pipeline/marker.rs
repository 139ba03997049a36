//! Line-start markers for single-line blocks: headings, quotes and rules.
//!
//! All functions take a line that has already been trimmed.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+").unwrap());

static RE_QUOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^>\s?").unwrap());

static RE_RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*_]{3,}$").unwrap());

/// Split a heading line into its `#` count and the text after the marker.
pub fn heading(trimmed: &str) -> Option<(usize, &str)> {
    let caps = RE_HEADING.captures(trimmed)?;
    let hashes = caps.get(1)?.as_str().len();
    let end = caps.get(0)?.end();
    Some((hashes, &trimmed[end..]))
}

/// Headings of depth 1–3. Only these interrupt a running paragraph.
pub fn is_shallow_heading(trimmed: &str) -> bool {
    heading(trimmed).is_some_and(|(hashes, _)| hashes <= 3)
}

/// Text of a blockquote line after `>` and any following whitespace.
pub fn quote(trimmed: &str) -> Option<&str> {
    RE_QUOTE
        .is_match(trimmed)
        .then(|| trimmed[1..].trim_start())
}

/// Horizontal rule: three or more `-`, `*` or `_` characters, in any mix.
pub fn is_rule(trimmed: &str) -> bool {
    RE_RULE.is_match(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings() {
        assert_eq!(heading("# Title"), Some((1, "Title")));
        assert_eq!(heading("###### Deep"), Some((6, "Deep")));
        assert_eq!(heading("####### Too deep"), None);
        assert_eq!(heading("#NoSpace"), None);
        assert!(is_shallow_heading("### h3"));
        assert!(!is_shallow_heading("#### h4"));
    }

    #[test]
    fn quotes() {
        assert_eq!(quote("> quoted"), Some("quoted"));
        assert_eq!(quote(">tight"), Some("tight"));
        assert_eq!(quote(">"), Some(""));
        assert_eq!(quote("not > quoted"), None);
    }

    #[test]
    fn rules() {
        for line in ["---", "***", "___", "-----"] {
            assert!(is_rule(line), "{line}");
        }
        assert!(is_rule("-*_"), "mixed characters still match");
        assert!(!is_rule("--"));
        assert!(!is_rule("- - -"));
    }
}
