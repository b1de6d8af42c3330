//! Subtitle index: timed caption cues parsed from a WebVTT-like file.
//!
//! The index is built once per run and is read-only afterwards. It answers
//! the total duration of the video and merged caption text for a time range.

mod merge;
mod vtt;

pub use merge::{merge_texts, reflow, text_for_range};
pub use vtt::{format_vtt_timestamp, parse, parse_header, parse_lines, to_vtt};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One timed caption entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleCue {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Caption text, lines joined with spaces.
    pub text: String,
}

impl SubtitleCue {
    pub fn new(start: f64, end: f64, text: String) -> Self {
        Self { start, end, text }
    }
}

/// Whole seconds up to the end of the last cue, or 0 without cues.
pub fn total_duration(cues: &[SubtitleCue]) -> u32 {
    cues.last().map(|c| c.end.max(0.0) as u32).unwrap_or(0)
}

/// Parsed subtitle file together with its raw lines.
///
/// The raw lines are what the summary model reads; the cues are what the
/// validator and renderer query.
#[derive(Debug, Clone, Default)]
pub struct SubtitleIndex {
    lines: Vec<String>,
    cues: Vec<SubtitleCue>,
}

impl SubtitleIndex {
    /// Build an index from raw subtitle lines.
    pub fn from_lines(lines: Vec<String>) -> Self {
        let cues = parse_lines(&lines);
        Self { lines, cues }
    }

    /// Build an index from a subtitle document.
    pub fn from_content(content: &str) -> Self {
        Self::from_lines(content.lines().map(|l| l.trim().to_string()).collect())
    }

    /// Build an index from already-timed cues, rendering them as WebVTT.
    pub fn from_cues(cues: Vec<SubtitleCue>) -> Self {
        let content = to_vtt(&cues);
        Self::from_content(&content)
    }

    /// Read and parse a subtitle file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_content(&content))
    }

    pub fn cues(&self) -> &[SubtitleCue] {
        &self.cues
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Total duration in whole seconds.
    pub fn total_duration(&self) -> u32 {
        total_duration(&self.cues)
    }

    /// Merged caption text for `[start, end)`.
    pub fn text_for_range(&self, start: u32, end: Option<u32>) -> String {
        text_for_range(&self.cues, start as f64, end.map(|e| e as f64))
    }

    /// The raw file text, one line per entry.
    pub fn raw_text(&self) -> String {
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_duration_truncates() {
        let index = SubtitleIndex::from_content(
            "WEBVTT\n\n00:00:00.000 --> 00:00:05.000\na\n\n00:19:59.000 --> 00:20:00.999\nb\n",
        );
        assert_eq!(index.total_duration(), 1200);
    }

    #[test]
    fn test_total_duration_empty() {
        assert_eq!(SubtitleIndex::from_content("WEBVTT\n\nno cues").total_duration(), 0);
        assert_eq!(total_duration(&[]), 0);
    }

    #[test]
    fn test_from_cues_keeps_timing() {
        let index = SubtitleIndex::from_cues(vec![
            SubtitleCue::new(0.0, 3.0, "first".to_string()),
            SubtitleCue::new(3.0, 7.25, "second".to_string()),
        ]);
        assert_eq!(index.cues().len(), 2);
        assert_eq!(index.total_duration(), 7);
        assert!(index.raw_text().starts_with("WEBVTT"));
        assert_eq!(index.text_for_range(3, None), "second");
    }

    #[test]
    fn test_from_cues_keeps_numeric_captions() {
        let index = SubtitleIndex::from_cues(vec![
            SubtitleCue::new(0.0, 2.0, "2024".to_string()),
            SubtitleCue::new(2.0, 4.0, "NOTE this carefully.".to_string()),
            SubtitleCue::new(4.0, 6.0, "end".to_string()),
        ]);
        let texts: Vec<&str> = index.cues().iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["2024", "NOTE this carefully.", "end"]);

        let excerpt = index.text_for_range(0, None);
        assert!(excerpt.starts_with("2024 NOTE this carefully."));
        assert!(excerpt.ends_with("end"));
    }
}
