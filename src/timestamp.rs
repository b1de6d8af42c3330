//! Japanese timestamp phrases used by the summary text.
//!
//! The summary model is asked to mark each topic with a phrase such as
//! `動画：16分27秒頃` ("video: around 16 min 27 s"). This module turns those
//! phrases into whole seconds and back.
//!
//! Each line is expected to carry at most one timestamp. When a line contains
//! several, only the first one is used.

use regex::Regex;
use std::sync::LazyLock;

/// `(H時間)?(M分)?S秒頃`, anywhere in a string.
static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:([0-9]+)時間)?(?:([0-9]+)分)?([0-9]+)秒頃").expect("Invalid regex")
});

/// A line that is nothing but a timestamp, optionally prefixed with `動画：`.
static STANDALONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:動画[:：]?\s*)?(?:[0-9]+時間)?(?:[0-9]+分)?[0-9]+秒頃$").expect("Invalid regex")
});

/// Parse the first timestamp phrase found in `text` into seconds.
///
/// Missing hour and minute parts count as zero. Returns `None` when the text
/// has no timestamp or the value does not fit in a `u32`.
pub fn parse(text: &str) -> Option<u32> {
    let caps = TIMESTAMP.captures(text)?;

    let unit = |idx: usize| -> Option<u32> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };

    let hours = unit(1)?;
    let minutes = unit(2)?;
    let seconds = unit(3)?;

    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// Parse a line that consists solely of a timestamp phrase.
pub fn parse_standalone(line: &str) -> Option<u32> {
    let line = line.trim();
    if STANDALONE.is_match(line) {
        parse(line)
    } else {
        None
    }
}

/// Format seconds as `H時間M分SS秒頃`, or `M分SS秒頃` under an hour.
pub fn format(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}時間{}分{:02}秒頃", hours, minutes, secs)
    } else {
        format!("{}分{:02}秒頃", minutes, secs)
    }
}

/// Format seconds as `m:ss` (minutes are not wrapped into hours).
pub fn format_clock(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Format seconds as `M分SS秒`, used in image tooltips.
pub fn format_minutes_label(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}分{:02}秒", total / 60, total % 60)
}

/// Collect `(line index, seconds)` for every line carrying a timestamp.
pub fn extract_all<S: AsRef<str>>(lines: &[S]) -> Vec<(usize, u32)> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| parse(line.as_ref()).map(|sec| (idx, sec)))
        .collect()
}
