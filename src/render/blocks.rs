//! Body blocks: paragraphs and list runs inside a section.

use super::inline::format_inline;
use regex::Regex;
use std::sync::LazyLock;

/// `*`/`-` need a following space (`**bold**` is not a bullet); `・` does not.
static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[*\-](?:\s+(.*))?|・\s*(.*))$").expect("Invalid regex"));
static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[0-9]+[.)．]\s+(.*)$").expect("Invalid regex"));
static RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:-{3,}|\*{3,}|_{3,})\s*$").expect("Invalid regex"));

/// A rendered body element. Text is already inline-formatted HTML.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(String),
    List { ordered: bool, items: Vec<String> },
}

impl Block {
    pub fn to_html(&self) -> String {
        match self {
            Block::Paragraph(text) => format!("<p>{}</p>", text),
            Block::List { ordered, items } => {
                let tag = if *ordered { "ol" } else { "ul" };
                let mut out = format!("<{}>\n", tag);
                for item in items {
                    out.push_str(&format!("<li>{}</li>\n", item));
                }
                out.push_str(&format!("</{}>", tag));
                out
            }
        }
    }
}

/// How a body line reads.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind<'a> {
    Item { ordered: bool, text: &'a str },
    Rule,
    Text(&'a str),
}

pub fn classify(line: &str) -> LineKind<'_> {
    if RULE.is_match(line) {
        return LineKind::Rule;
    }
    if let Some(caps) = BULLET.captures(line) {
        let text = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str()).unwrap_or("");
        return LineKind::Item { ordered: false, text };
    }
    if let Some(caps) = NUMBERED.captures(line) {
        let text = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        return LineKind::Item { ordered: true, text };
    }
    LineKind::Text(line.trim())
}

/// Accumulates body lines, grouping consecutive items of one kind into a list.
#[derive(Debug, Clone, Default)]
pub struct BodyBuilder {
    blocks: Vec<Block>,
}

impl BodyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one source line. Empty results (degenerate items, rules) are dropped.
    pub fn push_line(&mut self, line: &str) {
        match classify(line) {
            LineKind::Rule => {}
            LineKind::Item { ordered, text } => self.push_item(ordered, text),
            LineKind::Text(text) => self.push_paragraph(text),
        }
    }

    pub fn push_paragraph(&mut self, text: &str) {
        let html = format_inline(text.trim());
        if !html.trim().is_empty() {
            self.blocks.push(Block::Paragraph(html));
        }
    }

    pub fn push_item(&mut self, ordered: bool, text: &str) {
        let html = format_inline(text.trim());
        if html.trim().is_empty() {
            return;
        }
        match self.blocks.last_mut() {
            Some(Block::List { ordered: o, items }) if *o == ordered => items.push(html),
            _ => self.blocks.push(Block::List {
                ordered,
                items: vec![html],
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Close any open list and hand back the blocks.
    pub fn finish(self) -> Vec<Block> {
        self.blocks
    }
}

/// Render blocks one per line.
pub fn blocks_to_html(blocks: &[Block]) -> String {
    blocks.iter().map(Block::to_html).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("* item"), LineKind::Item { ordered: false, text: "item" });
        assert_eq!(classify("  - item"), LineKind::Item { ordered: false, text: "item" });
        assert_eq!(classify("2. second"), LineKind::Item { ordered: true, text: "second" });
        assert_eq!(classify("*"), LineKind::Item { ordered: false, text: "" });
        assert_eq!(classify("**太字**で始まる文"), LineKind::Text("**太字**で始まる文"));
        assert_eq!(classify("---"), LineKind::Rule);
    }

    #[test]
    fn test_nakaguro_bullets() {
        assert_eq!(classify("・項目"), LineKind::Item { ordered: false, text: "項目" });
        assert_eq!(classify("・ 項目"), LineKind::Item { ordered: false, text: "項目" });
        assert_eq!(classify("-項目"), LineKind::Text("-項目"));

        let mut body = BodyBuilder::new();
        body.push_line("・項目一");
        body.push_line("・項目二");
        assert_eq!(
            body.finish(),
            vec![Block::List {
                ordered: false,
                items: vec!["項目一".to_string(), "項目二".to_string()]
            }]
        );
    }

    #[test]
    fn test_list_runs() {
        let mut body = BodyBuilder::new();
        body.push_line("intro");
        body.push_line("* a");
        body.push_line("* **b**");
        body.push_line("* **");
        body.push_line("1. one");
        body.push_line("outro");

        let blocks = body.finish();
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph("intro".to_string()),
                Block::List {
                    ordered: false,
                    items: vec!["a".to_string(), "<b>b</b>".to_string()]
                },
                Block::List {
                    ordered: true,
                    items: vec!["one".to_string()]
                },
                Block::Paragraph("outro".to_string()),
            ]
        );
        assert_eq!(
            blocks_to_html(&blocks[1..2]),
            "<ul>\n<li>a</li>\n<li><b>b</b></li>\n</ul>"
        );
    }
}
