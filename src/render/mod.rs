//! Section partitioning and HTML rendering.
//!
//! A [`Summary`] is either the freeform Markdown lines written by the model or
//! the structured JSON variant. Both are partitioned into [`SummarySection`]s
//! that share the image matcher, timestamp lexer and subtitle index, and are
//! then laid out into one self-contained HTML page.

mod blocks;
pub mod detail;
pub mod freeform;
mod html;
pub mod inline;
pub mod structured;

pub use blocks::{Block, BodyBuilder};
pub use detail::markdown_to_html;
pub use inline::{escape_html, format_inline};
pub use structured::{StructuredSection, StructuredSummary};

use crate::error::Result;
use crate::storyboard::{ImageCandidate, MatchConfig};
use crate::subtitle::SubtitleCue;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A model-written summary in one of its two shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    /// Markdown lines, in the order the model wrote them.
    Freeform(Vec<String>),
    Structured(StructuredSummary),
}

impl Summary {
    pub fn freeform(text: &str) -> Self {
        Summary::Freeform(text.lines().map(str::to_string).collect())
    }

    /// Plain-text backup: the joined lines, or pretty JSON.
    pub fn backup(&self) -> Result<String> {
        match self {
            Summary::Freeform(lines) => Ok(lines.join("\n")),
            Summary::Structured(s) => Ok(serde_json::to_string_pretty(s)?),
        }
    }
}

/// A section heading with inline-formatted HTML text.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub level: u8,
    pub html: String,
}

/// One block of the rendered summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummarySection {
    pub heading: Option<Heading>,
    pub body: Vec<Block>,
    pub timestamp: Option<u32>,
    pub images: Vec<ImageCandidate>,
    pub subtitle_excerpt: Option<String>,
}

/// Everything the renderer needs besides the summary and cues.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Deep-link prefix; appending integer seconds must yield a valid URL.
    pub url_base: String,
    pub images: Vec<ImageCandidate>,
    pub match_config: MatchConfig,
    pub subtitle_excerpts: bool,
    /// Directory of the HTML file, for relative image `src`.
    pub html_dir: Option<PathBuf>,
    pub title: Option<String>,
    pub thumbnail_url: Option<String>,
    pub detail_text: Option<String>,
    /// Embed URL prefix for the hover preview; `None` disables the script.
    pub preview_embed_base: Option<String>,
}

impl RenderOptions {
    pub fn new(url_base: impl Into<String>) -> Self {
        Self {
            url_base: url_base.into(),
            images: Vec::new(),
            match_config: MatchConfig::default(),
            subtitle_excerpts: true,
            html_dir: None,
            title: None,
            thumbnail_url: None,
            detail_text: None,
            preview_embed_base: None,
        }
    }
}

/// A rendered page and its backup text.
#[derive(Debug, Clone)]
pub struct Document {
    pub html: String,
    pub backup: String,
    pub sections: Vec<SummarySection>,
}

impl Document {
    /// Write the page to `html_path` and the backup to `html_path + ".txt"`.
    /// Returns the backup path.
    pub fn write(&self, html_path: &Path) -> Result<PathBuf> {
        if let Some(parent) = html_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(html_path, &self.html)?;

        let backup_path = backup_path(html_path);
        std::fs::write(&backup_path, &self.backup)?;

        info!("Wrote {} and {}", html_path.display(), backup_path.display());
        Ok(backup_path)
    }
}

/// `<html path>.txt`
pub fn backup_path(html_path: &Path) -> PathBuf {
    let mut name = OsString::from(html_path.as_os_str());
    name.push(".txt");
    PathBuf::from(name)
}

/// Partition `summary` into sections and lay them out as a page.
pub fn render(summary: &Summary, cues: &[SubtitleCue], options: &RenderOptions) -> Result<Document> {
    let sections = match summary {
        Summary::Freeform(lines) => freeform::partition(lines, cues, options),
        Summary::Structured(s) => structured::partition(s, options),
    };
    debug!("Partitioned summary into {} sections", sections.len());

    let title = options.title.as_deref().or(match summary {
        Summary::Structured(s) => Some(s.title.as_str()),
        Summary::Freeform(_) => None,
    });

    let html = assemble(&sections, title, options);
    Ok(Document {
        html,
        backup: summary.backup()?,
        sections,
    })
}

fn assemble(sections: &[SummarySection], title: Option<&str>, options: &RenderOptions) -> String {
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
    let mut lines = html::page_head(title, &generated);

    if let Some(url) = &options.thumbnail_url {
        lines.push(html::thumbnail(url));
    }
    if options.detail_text.is_some() {
        lines.push(html::jump_link());
    }

    let html_dir = options.html_dir.as_deref();
    for section in sections {
        lines.extend(html::section(section, &options.url_base, html_dir));
    }

    if let Some(detail) = &options.detail_text {
        lines.push(detail::detail_block(detail));
    }
    if let Some(embed_base) = &options.preview_embed_base {
        lines.push(html::preview_script(embed_base));
    }

    lines.push(html::page_tail().to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cues() -> Vec<SubtitleCue> {
        vec![
            SubtitleCue::new(0.0, 10.0, "冒頭".to_string()),
            SubtitleCue::new(1190.0, 1200.0, "終わり".to_string()),
        ]
    }

    #[test]
    fn test_page_layout_order() {
        let summary = Summary::freeform("## A（動画：0分10秒頃）\n本文");
        let mut options = RenderOptions::new("https://www.youtube.com/watch?v=abc&t=");
        options.thumbnail_url = Some("https://i.ytimg.com/vi/abc/hq.jpg".to_string());
        options.detail_text = Some("# 詳細\n全文".to_string());
        options.preview_embed_base = Some("https://www.youtube.com/embed/abc?start=".to_string());

        let doc = render(&summary, &cues(), &options).unwrap();
        let html = &doc.html;

        assert!(html.starts_with("<html>"));
        assert!(html.ends_with("</body></html>"));
        let thumb = html.find("class='thumbnail'").unwrap();
        let jump = html.find("#detail-section").unwrap();
        let section = html.find("timestamp-section").unwrap();
        let detail = html.find("id='detail-section'").unwrap();
        let script = html.find("<script>").unwrap();
        assert!(thumb < jump && jump < section && section < detail && detail < script);
    }

    #[test]
    fn test_optional_parts_absent() {
        let doc = render(&Summary::freeform("本文"), &[], &RenderOptions::new("u?t=")).unwrap();
        assert!(!doc.html.contains("<script>"));
        assert!(!doc.html.contains("detail-section"));
        assert!(!doc.html.contains("class='thumbnail'"));
        assert_eq!(doc.html.matches("timestamp-section").count(), 0);
    }

    #[test]
    fn test_write_with_backup() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out").join("video.html");
        let summary = Summary::freeform("# 要約\n本文");

        let doc = render(&summary, &[], &RenderOptions::new("u?t="))?;
        let backup = doc.write(&path)?;

        assert_eq!(backup, dir.path().join("out").join("video.html.txt"));
        assert_eq!(std::fs::read_to_string(&backup)?, "# 要約\n本文");
        assert!(std::fs::read_to_string(&path)?.contains("<h1>要約</h1>"));
        Ok(())
    }
}
