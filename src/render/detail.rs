//! The optional long-form detail block shown after the sections.

use super::blocks::BodyBuilder;
use super::inline::format_inline;
use regex::Regex;
use std::sync::LazyLock;

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#+)\s*(.*)$").expect("Invalid regex"));

/// Block-level Markdown to HTML: headings (capped at h4), `*`/`-` lists and
/// paragraphs, with inline formatting applied to each.
pub fn markdown_to_html(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut body = BodyBuilder::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = HEADING.captures(line) {
            out.extend(std::mem::take(&mut body).finish().iter().map(|b| b.to_html()));
            let level = caps[1].len().min(4);
            out.push(format!("<h{}>{}</h{}>", level, format_inline(caps[2].trim()), level));
        } else {
            body.push_line(line);
        }
    }
    out.extend(body.finish().iter().map(|b| b.to_html()));
    out.join("\n")
}

/// The detail text wrapped in the jump-link target.
pub fn detail_block(text: &str) -> String {
    format!(
        "<div id='detail-section' class='detail-section'>\n<h2>📄 詳細</h2>\n{}\n</div>",
        markdown_to_html(text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_to_html() {
        let text = "# 見出し\n\n段落の**強調**\n* 項目1\n- 項目2\n###### 深い見出し\n終わり";
        assert_eq!(
            markdown_to_html(text),
            "<h1>見出し</h1>\n<p>段落の<b>強調</b></p>\n<ul>\n<li>項目1</li>\n<li>項目2</li>\n</ul>\n<h4>深い見出し</h4>\n<p>終わり</p>"
        );
    }

    #[test]
    fn test_detail_block_anchor() {
        let html = detail_block("本文");
        assert!(html.starts_with("<div id='detail-section'"));
        assert!(html.contains("<p>本文</p>"));
    }
}
