//! Link sanitisation: decide whether a Markdown link target may become a
//! Notion hyperlink, and normalise it when it can.
//!
//! Notion only accepts absolute web URLs in rich-text links. Anything else
//! (in-page anchors, relative paths, `mailto:`) makes the whole append call
//! fail, so such targets are rejected here and the caller keeps only the
//! link label.

use url::Url;

/// Prefixes that are never turned into links.
const REJECTED_PREFIXES: &[&str] = &["#", "./", "../", "mailto:", "tel:", "file:"];

/// Validate and normalise a link target.
///
/// Rules, applied in order:
/// 1. empty input is rejected;
/// 2. anchors, relative paths, `mailto:`, `tel:` and `file:` are rejected;
/// 3. a target without an `http(s)://` scheme gets `https://` prepended when
///    it looks like a bare domain (contains `.`, no whitespace, longer than 3
///    characters), otherwise it is rejected;
/// 4. the result must parse as an absolute URL.
///
/// Returns the (possibly prefixed) URL string unchanged by the parser, so
/// `example.com` becomes `https://example.com` and not `https://example.com/`.
pub fn sanitize(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }

    if REJECTED_PREFIXES.iter().any(|p| url.starts_with(p)) {
        return None;
    }

    let candidate = if has_web_scheme(url) {
        url.to_string()
    } else if looks_like_domain(url) {
        format!("https://{url}")
    } else {
        return None;
    };

    Url::parse(&candidate).ok().map(|_| candidate)
}

fn has_web_scheme(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn looks_like_domain(url: &str) -> bool {
    url.contains('.') && !url.chars().any(char::is_whitespace) && url.chars().count() > 3
}
