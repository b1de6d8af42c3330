//! Inline Markdown: bold spans and bare URLs.
//!
//! Text is not HTML-escaped here; callers interpolating untrusted text such as
//! caption excerpts escape it themselves with [`escape_html`].

use regex::{Captures, Regex};
use std::sync::LazyLock;

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("Invalid regex"));
static STRAY_BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*").expect("Invalid regex"));
static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"'（）「」、。]+"#).expect("Invalid regex"));

/// Convert `**bold**` to `<b>` and bare URLs to anchors.
///
/// Unmatched `**` markers are removed, and bold spans with no content are
/// dropped rather than rendered as empty elements.
pub fn format_inline(text: &str) -> String {
    let bolded = BOLD.replace_all(text, |caps: &Captures| {
        if caps[1].trim().is_empty() {
            String::new()
        } else {
            format!("<b>{}</b>", &caps[1])
        }
    });
    let cleaned = STRAY_BOLD.replace_all(&bolded, "");
    linkify(&cleaned)
}

/// Wrap bare `http(s)://` URLs in anchors opening a new tab.
pub fn linkify(text: &str) -> String {
    BARE_URL
        .replace_all(text, |caps: &Captures| {
            let url = &caps[0];
            format!(r#"<a href="{}" target="_blank">{}</a>"#, escape_attr(url), url)
        })
        .into_owned()
}

/// Escape `&`, `<` and `>` for element content.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Escape text for a quoted attribute value.
pub fn escape_attr(text: &str) -> String {
    escape_html(text).replace('"', "&quot;").replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold() {
        assert_eq!(format_inline("これは**重要**な点"), "これは<b>重要</b>な点");
        assert_eq!(format_inline("**a** and **b**"), "<b>a</b> and <b>b</b>");
    }

    #[test]
    fn test_unmatched_marker_removed() {
        assert_eq!(format_inline("**a** and **b"), "<b>a</b> and b");
        assert_eq!(format_inline("dangling**"), "dangling");
    }

    #[test]
    fn test_degenerate_bold_dropped() {
        assert_eq!(format_inline("**"), "");
        assert_eq!(format_inline("** **"), "");
        assert_eq!(format_inline("****"), "");
    }

    #[test]
    fn test_no_escaping() {
        assert_eq!(format_inline("a < b & c"), "a < b & c");
    }

    #[test]
    fn test_bare_url() {
        assert_eq!(
            format_inline("詳細は https://example.com/a?b=1&c=2 を参照"),
            r#"詳細は <a href="https://example.com/a?b=1&amp;c=2" target="_blank">https://example.com/a?b=1&c=2</a> を参照"#
        );
    }

    #[test]
    fn test_bold_url() {
        assert_eq!(
            format_inline("**https://example.com**"),
            r#"<b><a href="https://example.com" target="_blank">https://example.com</a></b>"#
        );
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_html("<a & b>"), "&lt;a &amp; b&gt;");
        assert_eq!(escape_attr("it's \"x\""), "it&#39;s &quot;x&quot;");
    }
}
