//! WebVTT-like subtitle parsing and writing.

use super::SubtitleCue;
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

/// `HH:MM:SS.mmm --> HH:MM:SS.mmm`, tolerant of padding and `,` separators.
static CUE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{1,2}):(\d{1,2}):(\d{1,2})[.,](\d{1,3})\s*-->\s*(\d{1,2}):(\d{1,2}):(\d{1,2})[.,](\d{1,3})",
    )
    .expect("Invalid regex")
});

/// Inline cue markup: karaoke timestamps and styling spans.
static INLINE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<\d{1,2}:\d{2}(?::\d{2})?[.,]\d{1,3}>|</?(?:c|i|b|u|v|lang|ruby|rt)(?:[.\s][^>]*)?>")
        .expect("Invalid regex")
});

/// Parse raw subtitle lines into cues ordered by start time.
pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Vec<SubtitleCue> {
    let mut cues = Vec::new();
    let mut current: Option<SubtitleCue> = None;

    for raw in lines {
        let line = raw.as_ref().trim();

        if let Some((start, end)) = parse_header(line) {
            cues.extend(current.take());
            current = Some(SubtitleCue::new(start, end, String::new()));
            continue;
        }

        if line.is_empty() {
            cues.extend(current.take());
            continue;
        }

        // Metadata only appears between cues; inside a payload every line is text
        let Some(cue) = current.as_mut() else {
            if !is_metadata(line) {
                trace!("Ignoring text outside a cue: {}", line);
            }
            continue;
        };

        let text = INLINE_TAG.replace_all(line, "");
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        if !cue.text.is_empty() {
            cue.text.push(' ');
        }
        cue.text.push_str(text);
    }
    cues.extend(current);

    cues.sort_by(|a, b| a.start.total_cmp(&b.start));
    cues
}

/// Parse a whole subtitle document.
pub fn parse(content: &str) -> Vec<SubtitleCue> {
    let lines: Vec<&str> = content.lines().collect();
    parse_lines(&lines)
}

/// Parse a cue header line into `(start, end)` seconds.
pub fn parse_header(line: &str) -> Option<(f64, f64)> {
    let caps = CUE_HEADER.captures(line)?;
    let field = |idx: usize| caps.get(idx).map(|m| m.as_str()).unwrap_or("0");

    let start = clock_to_seconds(field(1), field(2), field(3), field(4))?;
    let end = clock_to_seconds(field(5), field(6), field(7), field(8))?;
    Some((start, end))
}

fn clock_to_seconds(h: &str, m: &str, s: &str, frac: &str) -> Option<f64> {
    let h: f64 = h.parse().ok()?;
    let m: f64 = m.parse().ok()?;
    let s: f64 = s.parse().ok()?;
    // ".5" is half a second, not five milliseconds
    let ms: f64 = format!("{:0<3}", frac).parse().ok()?;
    Some(h * 3600.0 + m * 60.0 + s + ms / 1000.0)
}

/// File header, cue numbers and comment blocks, as seen between cues.
fn is_metadata(line: &str) -> bool {
    line.starts_with("WEBVTT")
        || line.starts_with("Kind:")
        || line.starts_with("Language:")
        || line.starts_with("NOTE")
        || line.chars().all(|c| c.is_ascii_digit())
}

/// Render cues as a WebVTT document.
pub fn to_vtt(cues: &[SubtitleCue]) -> String {
    let mut output = String::from("WEBVTT\n\n");

    for cue in cues {
        output.push_str(&format!(
            "{} --> {}\n",
            format_vtt_timestamp(cue.start),
            format_vtt_timestamp(cue.end)
        ));
        output.push_str(&cue.text);
        output.push_str("\n\n");
    }

    output
}

/// Format timestamp for VTT (00:00:00.000).
pub fn format_vtt_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let ms = total_ms % 1000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "WEBVTT
Kind: captions
Language: ja

1
00:00:01.000 --> 00:00:04.500
こんにちは
皆さん

2
00:00:04,500 --> 00:00:09,000 align:start position:0%
<00:00:05.100><c>今日は</c><00:00:06.000><c> 料理</c>

NOTE this is a comment
with two lines

0:0:9.5 --> 0:0:12.25
最後
";

    #[test]
    fn test_parse_sample() {
        let cues = parse(SAMPLE);
        assert_eq!(cues.len(), 3);

        assert_eq!(cues[0].start, 1.0);
        assert_eq!(cues[0].end, 4.5);
        assert_eq!(cues[0].text, "こんにちは 皆さん");

        assert_eq!(cues[1].start, 4.5);
        assert_eq!(cues[1].text, "今日は 料理");

        assert_eq!(cues[2].start, 9.5);
        assert_eq!(cues[2].end, 12.25);
        assert_eq!(cues[2].text, "最後");
    }

    #[test]
    fn test_header_without_text_is_kept() {
        let cues = parse("00:00:01.000 --> 00:00:02.000\n\n00:00:02.000 --> 00:00:03.000\nhi\n");
        assert_eq!(cues.len(), 2);
        assert!(cues[0].text.is_empty());
        assert_eq!(cues[1].text, "hi");
    }

    #[test]
    fn test_parse_header_rejects_garbage() {
        assert!(parse_header("hello --> world").is_none());
        assert!(parse_header("").is_none());
    }

    #[test]
    fn test_metadata_lookalikes_inside_cue_are_text() {
        let cues = vec![
            SubtitleCue::new(0.0, 2.0, "2024".to_string()),
            SubtitleCue::new(2.0, 4.0, "NOTE this carefully.".to_string()),
            SubtitleCue::new(4.0, 6.0, "Language: 日本語".to_string()),
            SubtitleCue::new(6.0, 8.0, "end".to_string()),
        ];
        assert_eq!(parse(&to_vtt(&cues)), cues);

        let cues = parse("WEBVTT\n\n1\n00:00:00.000 --> 00:00:02.000\n3\n2\n\nNOTE skipped\n");
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "3 2");
    }

    #[test]
    fn test_vtt_timestamp() {
        assert_eq!(format_vtt_timestamp(0.0), "00:00:00.000");
        assert_eq!(format_vtt_timestamp(61.5), "00:01:01.500");
        assert_eq!(format_vtt_timestamp(3661.123), "01:01:01.123");
    }

    #[test]
    fn test_writer_output_parses_back() {
        let cues = vec![
            SubtitleCue::new(0.0, 2.5, "Hello world.".to_string()),
            SubtitleCue::new(2.5, 5.0, "This is a test.".to_string()),
        ];
        let vtt = to_vtt(&cues);
        assert!(vtt.starts_with("WEBVTT"));
        assert!(vtt.contains("00:00:00.000 --> 00:00:02.500\nHello world."));
        assert_eq!(parse(&vtt), cues);
    }
}
