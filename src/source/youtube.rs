//! YouTube source implementation backed by yt-dlp.

use super::{Transcript, TranscriptSource, VideoInfo};
use crate::error::{Result, YoyakuError};
use crate::subtitle;
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info, instrument, warn};

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    // Matches various YouTube URL formats and bare video IDs
    Regex::new(
        r"(?x)
        (?:
            (?:https?://)?
            (?:www\.|m\.)?
            (?:youtube\.com/watch\?(?:.*&)?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/|youtube\.com/shorts/|youtube\.com/live/)
            ([a-zA-Z0-9_-]{11})
        )
        |
        ^([a-zA-Z0-9_-]{11})$
    ",
    )
    .expect("Invalid regex")
});

/// Extract the 11-character video ID from a URL or bare ID.
pub fn extract_video_id(input: &str) -> Option<String> {
    let caps = VIDEO_ID.captures(input.trim())?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str().to_string())
}

/// Which subtitle track to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackChoice {
    pub language: String,
    pub automatic: bool,
}

/// Pick a track from yt-dlp metadata.
///
/// Preferred languages are tried in order, each manual before automatic.
/// Failing that, any manual track, then any automatic one (original-language
/// captions first).
pub fn select_track(info: &serde_json::Value, languages: &[String]) -> Option<TrackChoice> {
    let manual = track_languages(&info["subtitles"]);
    let automatic = track_languages(&info["automatic_captions"]);

    for lang in languages {
        if manual.iter().any(|l| l == lang) {
            return Some(TrackChoice {
                language: lang.clone(),
                automatic: false,
            });
        }
        if automatic.iter().any(|l| l == lang) {
            return Some(TrackChoice {
                language: lang.clone(),
                automatic: true,
            });
        }
    }

    if let Some(lang) = manual.first() {
        return Some(TrackChoice {
            language: lang.clone(),
            automatic: false,
        });
    }
    automatic
        .iter()
        .find(|l| l.ends_with("-orig"))
        .or_else(|| automatic.first())
        .map(|lang| TrackChoice {
            language: lang.clone(),
            automatic: true,
        })
}

/// Languages with at least one track, sorted; `live_chat` is not a subtitle.
fn track_languages(tracks: &serde_json::Value) -> Vec<String> {
    let mut langs: Vec<String> = tracks
        .as_object()
        .map(|m| {
            m.iter()
                .filter(|(k, v)| *k != "live_chat" && v.as_array().is_some_and(|a| !a.is_empty()))
                .map(|(k, _)| k.clone())
                .collect()
        })
        .unwrap_or_default();
    langs.sort();
    langs
}

/// YouTube source driving the `yt-dlp` command.
pub struct YoutubeSource {
    languages: Vec<String>,
}

impl YoutubeSource {
    pub fn new(languages: Vec<String>) -> Self {
        Self { languages }
    }

    async fn run_ytdlp(args: &[&str]) -> Result<std::process::Output> {
        debug!("yt-dlp {}", args.join(" "));
        tokio::process::Command::new("yt-dlp")
            .args(args)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    YoyakuError::ToolNotFound("yt-dlp".to_string())
                } else {
                    YoyakuError::ToolFailed(format!("Failed to run yt-dlp: {}", e))
                }
            })
    }

    async fn download_track(&self, video: &VideoInfo, choice: &TrackChoice, dir: &Path) -> Result<String> {
        let template = dir.join("%(id)s.%(ext)s");
        let template = template.to_string_lossy();
        let write_flag = if choice.automatic { "--write-auto-subs" } else { "--write-subs" };

        let output = Self::run_ytdlp(&[
            "--skip-download",
            write_flag,
            "--sub-langs",
            &choice.language,
            "--sub-format",
            "vtt",
            "--no-warnings",
            "-o",
            &template,
            &video.url,
        ])
        .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(YoyakuError::Transcript(format!(
                "Subtitle download failed for {}: {}",
                video.id,
                stderr.trim()
            )));
        }

        let vtt = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .find(|p| p.extension().is_some_and(|ext| ext == "vtt"))
            .ok_or_else(|| YoyakuError::Transcript(format!("yt-dlp wrote no subtitle file for {}", video.id)))?;

        Ok(std::fs::read_to_string(vtt)?)
    }
}

impl Default for YoutubeSource {
    fn default() -> Self {
        Self::new(crate::config::TranscriptSettings::default().languages)
    }
}

#[async_trait]
impl TranscriptSource for YoutubeSource {
    #[instrument(skip(self))]
    async fn fetch_info(&self, input: &str) -> Result<VideoInfo> {
        let video_id = extract_video_id(input)
            .ok_or_else(|| YoyakuError::InvalidInput(format!("Invalid YouTube video ID or URL: {}", input)))?;
        let url = format!("https://www.youtube.com/watch?v={}", video_id);

        let output = Self::run_ytdlp(&["--dump-json", "--no-download", "--no-warnings", &url]).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(YoyakuError::VideoNotFound(format!(
                "Video {} not found or unavailable: {}",
                video_id,
                stderr.trim()
            )));
        }

        let raw: serde_json::Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| YoyakuError::Transcript(format!("Failed to parse yt-dlp output: {}", e)))?;

        let title = raw["title"].as_str().unwrap_or(&video_id).to_string();
        info!("Found video: {}", title);

        Ok(VideoInfo {
            title,
            thumbnail_url: raw["thumbnail"].as_str().map(str::to_string),
            duration_seconds: raw["duration"].as_f64().map(|d| d as u32),
            id: video_id,
            url,
            raw,
        })
    }

    #[instrument(skip(self, video), fields(video_id = %video.id))]
    async fn fetch_transcript(&self, video: &VideoInfo) -> Result<Transcript> {
        let choice = select_track(&video.raw, &self.languages)
            .ok_or_else(|| YoyakuError::Transcript(format!("No subtitles available for {}", video.id)))?;
        info!(
            "Using {} subtitles ({})",
            choice.language,
            if choice.automatic { "automatic" } else { "manual" }
        );
        if !self.languages.contains(&choice.language) {
            warn!("No subtitles in {:?}, falling back to {}", self.languages, choice.language);
        }

        let dir = tempfile::tempdir()?;
        let content = self.download_track(video, &choice, dir.path()).await?;
        let cues = subtitle::parse(&content);
        if cues.is_empty() {
            return Err(YoyakuError::Subtitle(format!(
                "Subtitle track {} for {} has no cues",
                choice.language, video.id
            )));
        }

        Ok(Transcript {
            language: choice.language,
            automatic: choice.automatic,
            cues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn langs(l: &[&str]) -> Vec<String> {
        l.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_video_id() {
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=10").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ?t=5").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(extract_video_id("https://youtube.com/shorts/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(extract_video_id("dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(extract_video_id("not a video"), None);
    }

    #[test]
    fn test_select_track_prefers_configured_order() {
        let info = json!({
            "subtitles": {"en": [{"ext": "vtt"}]},
            "automatic_captions": {"ja": [{"ext": "vtt"}], "en": [{"ext": "vtt"}]}
        });
        assert_eq!(
            select_track(&info, &langs(&["ja", "en"])),
            Some(TrackChoice {
                language: "ja".to_string(),
                automatic: true
            })
        );
        assert_eq!(
            select_track(&info, &langs(&["en", "ja"])),
            Some(TrackChoice {
                language: "en".to_string(),
                automatic: false
            })
        );
    }

    #[test]
    fn test_select_track_fallbacks() {
        let info = json!({
            "subtitles": {"live_chat": [{"ext": "json"}], "fr": [{"ext": "vtt"}]},
            "automatic_captions": {"de": [{"ext": "vtt"}]}
        });
        assert_eq!(select_track(&info, &langs(&["ja"])).unwrap().language, "fr");

        let info = json!({"automatic_captions": {"ab": [{}], "de-orig": [{}], "zz": []}});
        assert_eq!(
            select_track(&info, &langs(&["ja"])),
            Some(TrackChoice {
                language: "de-orig".to_string(),
                automatic: true
            })
        );

        assert_eq!(select_track(&json!({}), &langs(&["ja"])), None);
    }
}
