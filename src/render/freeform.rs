//! Partitioning of freeform Markdown summaries.
//!
//! Lines are scanned in order with one pending section. A heading or a
//! list item carrying a bolded `（動画：…秒頃）` starts a new section; a
//! line holding only a timestamp anchors the pending one. Everything else is
//! body text. Each line is assumed to carry at most one timestamp; only the
//! first on a line is used.
//!
//! A section anchored at line `i` ends at the first timestamp found on any
//! line after `i`, which is what bounds its images and subtitle excerpt.

use super::blocks::BodyBuilder;
use super::inline::format_inline;
use super::{Heading, RenderOptions, SummarySection};
use crate::storyboard::match_images;
use crate::subtitle::{text_for_range, SubtitleCue};
use crate::timestamp;
use regex::Regex;
use std::sync::LazyLock;

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#+)\s*(\S.*)$").expect("Invalid regex"));
static TIMED_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[*\-・]|[0-9]+[.)．])\s*\*\*([^*]+)\*\*\s*[:：]?\s*(.*)$").expect("Invalid regex")
});

const MAX_HEADING_LEVEL: u8 = 4;
const SUB_HEADING_LEVEL: u8 = 4;

/// Split `lines` into sections in detection order.
pub fn partition<S: AsRef<str>>(
    lines: &[S],
    cues: &[SubtitleCue],
    options: &RenderOptions,
) -> Vec<SummarySection> {
    let timestamps = timestamp::extract_all(lines);
    let next_after = |idx: usize| timestamps.iter().find(|(i, _)| *i > idx).map(|(_, t)| *t);

    let mut sections = Vec::new();
    let mut pending = Pending::default();

    for (idx, raw) in lines.iter().enumerate() {
        let line = raw.as_ref().trim_end();
        if line.trim().is_empty() {
            continue;
        }

        if let Some(caps) = HEADING.captures(line) {
            pending.flush_into(&mut sections);
            let level = (caps[1].len() as u8).min(MAX_HEADING_LEVEL);
            pending.heading = Some(Heading {
                level,
                html: format_inline(caps[2].trim()),
            });
            if let Some(ts) = timestamp::parse(&caps[2]) {
                pending.anchor(ts, next_after(idx), cues, options);
            }
            continue;
        }

        if let Some(ts) = timestamp::parse_standalone(line) {
            pending.anchor(ts, next_after(idx), cues, options);
            continue;
        }

        if let Some((title, ts, rest)) = timed_item(line) {
            pending.flush_into(&mut sections);
            pending.heading = Some(Heading {
                level: SUB_HEADING_LEVEL,
                html: format_inline(title.trim()),
            });
            pending.anchor(ts, next_after(idx), cues, options);
            if !rest.trim().is_empty() {
                pending.body.push_paragraph(rest);
            }
            continue;
        }

        pending.body.push_line(line);
    }

    pending.flush_into(&mut sections);
    sections
}

/// A bullet whose bold segment names a video moment:
/// `* **話題（動画：1分05秒頃）**: 説明`.
fn timed_item(line: &str) -> Option<(&str, u32, &str)> {
    let caps = TIMED_ITEM.captures(line)?;
    let bold = caps.get(1)?.as_str();
    if !bold.contains("動画") {
        return None;
    }
    let ts = timestamp::parse(bold)?;
    let rest = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    Some((bold, ts, rest))
}

#[derive(Default)]
struct Pending {
    heading: Option<Heading>,
    body: BodyBuilder,
    timestamp: Option<u32>,
    images: Vec<crate::storyboard::ImageCandidate>,
    excerpt: Option<String>,
}

impl Pending {
    fn anchor(&mut self, ts: u32, end: Option<u32>, cues: &[SubtitleCue], options: &RenderOptions) {
        let start = ts as f64;
        let end = end.map(|e| e as f64);

        self.timestamp = Some(ts);
        self.images = match_images(start, end, &options.images, &options.match_config);
        self.excerpt = if options.subtitle_excerpts && !cues.is_empty() {
            Some(text_for_range(cues, start, end)).filter(|t| !t.is_empty())
        } else {
            None
        };
    }

    fn flush_into(&mut self, sections: &mut Vec<SummarySection>) {
        let pending = std::mem::take(self);
        if pending.heading.is_none() && pending.body.is_empty() && pending.timestamp.is_none() {
            return;
        }
        sections.push(SummarySection {
            heading: pending.heading,
            body: pending.body.finish(),
            timestamp: pending.timestamp,
            images: pending.images,
            subtitle_excerpt: pending.excerpt,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Block;
    use crate::storyboard::ImageCandidate;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    fn cues() -> Vec<SubtitleCue> {
        vec![
            SubtitleCue::new(10.0, 15.0, "はじめに".to_string()),
            SubtitleCue::new(60.0, 65.0, "次の話題です。".to_string()),
            SubtitleCue::new(130.0, 135.0, "最後".to_string()),
        ]
    }

    #[test]
    fn test_headings_start_sections() {
        let text = "# 動画の要約\n導入文\n## 始まり（動画：0分10秒頃）\n* 要点\n## 次（動画：1分00秒頃）\n説明";
        let sections = partition(&lines(text), &cues(), &RenderOptions::new("u?t="));

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].timestamp, None);
        assert_eq!(sections[0].heading.as_ref().unwrap().level, 1);
        assert_eq!(sections[0].body, vec![Block::Paragraph("導入文".to_string())]);

        assert_eq!(sections[1].timestamp, Some(10));
        assert_eq!(sections[1].subtitle_excerpt.as_deref(), Some("はじめに"));
        assert_eq!(
            sections[1].body,
            vec![Block::List {
                ordered: false,
                items: vec!["要点".to_string()]
            }]
        );

        assert_eq!(sections[2].timestamp, Some(60));
        assert_eq!(sections[2].subtitle_excerpt.as_deref(), Some("次の話題です。\n最後"));
    }

    #[test]
    fn test_standalone_timestamp_anchors_current_section() {
        let text = "## 話題A\n動画：1分00秒頃\n本文\n## 話題B\n動画: 2分10秒頃";
        let sections = partition(&lines(text), &cues(), &RenderOptions::new("u?t="));

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].timestamp, Some(60));
        assert_eq!(sections[0].body.len(), 1);
        assert_eq!(sections[0].subtitle_excerpt.as_deref(), Some("次の話題です。"));
        assert_eq!(sections[1].timestamp, Some(130));
    }

    #[test]
    fn test_timed_list_item_becomes_sub_heading() {
        let text = "## まとめ\n* **導入（動画：0分10秒頃）**: 最初の説明\n* **本題（動画：1分00秒頃）**";
        let sections = partition(&lines(text), &[], &RenderOptions::new("u?t="));

        assert_eq!(sections.len(), 3);
        let sub = &sections[1];
        assert_eq!(sub.heading.as_ref().unwrap().level, SUB_HEADING_LEVEL);
        assert_eq!(sub.heading.as_ref().unwrap().html, "導入（動画：0分10秒頃）");
        assert_eq!(sub.timestamp, Some(10));
        assert_eq!(sub.body, vec![Block::Paragraph("最初の説明".to_string())]);
        assert!(sections[2].body.is_empty());
        assert_eq!(sub.subtitle_excerpt, None);
    }

    #[test]
    fn test_images_bounded_by_next_timestamp() {
        let mut options = RenderOptions::new("u?t=");
        options.images = vec![
            ImageCandidate::new("a.jpg", 10.0, 20.0),
            ImageCandidate::new("b.jpg", 530.0, 540.0),
        ];
        let text = "## A（動画：0分10秒頃）\n## B（動画：8分40秒頃）";
        let sections = partition(&lines(text), &[], &options);

        assert_eq!(sections[0].images, vec![options.images[0].clone()]);
        assert_eq!(sections[1].images, vec![options.images[1].clone()]);
    }

    #[test]
    fn test_blank_lines_and_degenerate_bullets_ignored() {
        let text = "## A\n\n* **\n\n本文\n";
        let sections = partition(&lines(text), &[], &RenderOptions::new("u?t="));
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].body, vec![Block::Paragraph("本文".to_string())]);
    }

    #[test]
    fn test_nakaguro_list_in_section() {
        let sections = partition(&lines("## A\n・項目一\n・項目二"), &[], &RenderOptions::new("u?t="));
        assert_eq!(
            sections[0].body,
            vec![Block::List {
                ordered: false,
                items: vec!["項目一".to_string(), "項目二".to_string()]
            }]
        );
    }

    #[test]
    fn test_excerpts_disabled() {
        let mut options = RenderOptions::new("u?t=");
        options.subtitle_excerpts = false;
        let sections = partition(&lines("## A（動画：0分10秒頃）"), &cues(), &options);
        assert_eq!(sections[0].subtitle_excerpt, None);
    }
}
