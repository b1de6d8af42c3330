//! Turning a time range of scrolling captions into readable prose.
//!
//! Auto-generated captions repeat text between consecutive cues: a cue is
//! often an exact copy of the previous one, or starts with the last few words
//! of it. Merging removes those repeats before the text is reflowed into one
//! sentence per line.

use super::SubtitleCue;
use regex::Regex;
use std::sync::LazyLock;

/// Shorter shared fragments are treated as coincidence, not repetition.
const MIN_OVERLAP: usize = 3;
const MAX_OVERLAP: usize = 50;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));
static JA_SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([。！？])").expect("Invalid regex"));
static EN_SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?]) ").expect("Invalid regex"));

/// Merged, reflowed text of all cues starting in `[start, end)`.
///
/// `end = None` extends the range to the end of the video.
pub fn text_for_range(cues: &[SubtitleCue], start: f64, end: Option<f64>) -> String {
    let texts = cues
        .iter()
        .filter(|c| c.start >= start && end.map_or(true, |e| c.start < e))
        .map(|c| c.text.trim())
        .filter(|t| !t.is_empty());

    reflow(&merge_texts(texts))
}

/// Join caption texts, dropping exact repeats and splicing overlaps.
pub fn merge_texts<'a>(texts: impl IntoIterator<Item = &'a str>) -> String {
    let mut pieces: Vec<String> = Vec::new();
    let mut previous: Option<&str> = None;

    for text in texts {
        if previous == Some(text) {
            continue;
        }
        previous = Some(text);

        match pieces.last_mut() {
            Some(last) => {
                let overlap = overlap_len(last, text);
                if overlap >= MIN_OVERLAP {
                    last.extend(text.chars().skip(overlap));
                } else {
                    pieces.push(text.to_string());
                }
            }
            None => pieces.push(text.to_string()),
        }
    }

    pieces.join(" ")
}

/// Longest `n` in `MIN_OVERLAP..=MAX_OVERLAP` where the last `n` chars of
/// `prev` equal the first `n` chars of `next`; 0 if none.
fn overlap_len(prev: &str, next: &str) -> usize {
    let prev: Vec<char> = prev.chars().collect();
    let next: Vec<char> = next.chars().collect();
    let max = MAX_OVERLAP.min(prev.len()).min(next.len());

    (MIN_OVERLAP..=max)
        .rev()
        .find(|&n| prev[prev.len() - n..] == next[..n])
        .unwrap_or(0)
}

/// Collapse whitespace and put each sentence on its own line.
pub fn reflow(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text, " ");
    let broken = JA_SENTENCE_END.replace_all(&collapsed, "${1}\n");
    let broken = EN_SENTENCE_END.replace_all(&broken, "${1}\n");

    broken
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
