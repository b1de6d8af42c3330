//! Video metadata and transcript acquisition.
//!
//! Provides a trait-based interface so the pipeline can run against yt-dlp
//! or a test double.

mod youtube;

pub use youtube::{extract_video_id, select_track, TrackChoice, YoutubeSource};

use crate::error::Result;
use crate::subtitle::SubtitleCue;
use async_trait::async_trait;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Metadata about a video.
#[derive(Debug, Clone)]
pub struct VideoInfo {
    pub id: String,
    /// Title as published, unsanitized.
    pub title: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: Option<u32>,
    /// Full yt-dlp `--dump-json` output, for storyboard formats.
    pub raw: serde_json::Value,
}

/// A subtitle track, normalized to cues.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub language: String,
    /// `true` for platform-generated captions.
    pub automatic: bool,
    pub cues: Vec<SubtitleCue>,
}

/// Trait for transcript providers.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Resolve a URL or ID to video metadata.
    async fn fetch_info(&self, input: &str) -> Result<VideoInfo>;

    /// Download the best available subtitle track.
    async fn fetch_transcript(&self, video: &VideoInfo) -> Result<Transcript>;
}

static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("Invalid regex"));
static HOSTILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\\/*?:"<>|&=%#@!`~^\[\]{}();',.。、「」‘’“”！？]"#).expect("Invalid regex")
});
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_]+").expect("Invalid regex"));

const MAX_TITLE_CHARS: usize = 100;

/// Make a title safe for file and directory names.
///
/// HTML entities are decoded, control and format characters dropped, path-
/// and URL-hostile punctuation removed, whitespace runs turned into a single
/// `_`, and long titles cut to 97 characters plus `...`.
pub fn sanitize_title(title: &str) -> String {
    let decoded = unescape_entities(title);
    let visible: String = decoded.chars().filter(|c| !is_invisible(*c)).collect();
    let stripped = HOSTILE.replace_all(&visible, "");
    let joined = WHITESPACE.replace_all(stripped.trim(), "_");
    let trimmed = joined.trim_matches('_');

    if trimmed.chars().count() > MAX_TITLE_CHARS {
        let head: String = trimmed.chars().take(MAX_TITLE_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        trimmed.to_string()
    }
}

/// Control characters plus zero-width and bidi formatting marks.
fn is_invisible(c: char) -> bool {
    c.is_control()
        || matches!(c, '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2060}'..='\u{2064}' | '\u{FEFF}' | '\u{00AD}')
}

/// Decode named and numeric HTML entities; unknown names are kept as-is.
pub fn unescape_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match body {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    _ => None,
                }
            };
            decoded.map(String::from).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Rust &amp; Go: a comparison"), "Rust_Go_a_comparison");
        assert_eq!(sanitize_title("「魚の捌き方」 入門編！"), "魚の捌き方_入門編");
        assert_eq!(sanitize_title("a\u{200B}b\u{0007}c d"), "abc_d");
        assert_eq!(sanitize_title("v1.2 release"), "v12_release");
        assert_eq!(sanitize_title(""), "");
    }

    #[test]
    fn test_sanitize_truncates() {
        let long = "あ".repeat(150);
        let out = sanitize_title(&long);
        assert_eq!(out.chars().count(), 100);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_unescape_entities() {
        assert_eq!(unescape_entities("&#39;x&#x41;&quot;&bogus;"), "'xA\"&bogus;");
    }
}
