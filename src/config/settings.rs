//! Configuration settings for Yoyaku.

use crate::storyboard::{MatchConfig, MAX_IMAGES};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub summary: SummarySettings,
    pub transcript: TranscriptSettings,
    pub storyboard: StoryboardSettings,
    pub render: RenderSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Root directory for generated pages; one subdirectory per video.
    pub output_dir: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            output_dir: "~/yoyaku".to_string(),
        }
    }
}

/// Summary generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    /// Chat model used for every request.
    pub model: String,
    /// Attempts before giving up on a badly distributed summary.
    pub max_attempts: u32,
    /// Minimum ratio of the last timestamp to the video duration.
    pub min_coverage: f64,
    /// Request the JSON section layout instead of Markdown.
    pub structured: bool,
    /// Also produce a cleaned full-transcript detail block.
    pub detail: bool,
    /// Ask for a short "動画のポイント" section after the summary.
    pub highlights: bool,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            model: "gpt-5-mini".to_string(),
            max_attempts: 8,
            min_coverage: crate::validate::DEFAULT_MIN_COVERAGE,
            structured: false,
            detail: false,
            highlights: true,
        }
    }
}

/// Subtitle track selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Preferred languages, tried in order before any other track.
    pub languages: Vec<String>,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            languages: vec!["ja".to_string(), "en".to_string(), "en-US".to_string()],
        }
    }
}

/// Storyboard thumbnail settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryboardSettings {
    pub enabled: bool,
    /// yt-dlp storyboard format (`sb0` is the largest).
    pub format_id: String,
}

impl Default for StoryboardSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            format_id: "sb0".to_string(),
        }
    }
}

/// HTML rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub max_images: usize,
    pub default_span_seconds: u32,
    pub widen_window_seconds: u32,
    /// Host used for video deep links, e.g. a cookie-free mirror.
    pub link_host: String,
    pub preview_script: bool,
    pub subtitle_excerpts: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_images: MAX_IMAGES,
            default_span_seconds: 300,
            widen_window_seconds: 60,
            link_host: "www.youtube.com".to_string(),
            preview_script: true,
            subtitle_excerpts: true,
        }
    }
}

impl RenderSettings {
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            max_images: self.max_images,
            default_span_seconds: self.default_span_seconds as f64,
            widen_window_seconds: self.widen_window_seconds as f64,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            settings.check()?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Reject values the pipeline cannot work with.
    pub fn check(&self) -> crate::error::Result<()> {
        use crate::error::YoyakuError;

        if self.summary.max_attempts == 0 {
            return Err(YoyakuError::Config("summary.max_attempts must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.summary.min_coverage) {
            return Err(YoyakuError::Config(format!(
                "summary.min_coverage must be between 0 and 1, got {}",
                self.summary.min_coverage
            )));
        }
        if self.render.max_images > MAX_IMAGES {
            return Err(YoyakuError::Config(format!(
                "render.max_images must be at most {}, got {}",
                MAX_IMAGES, self.render.max_images
            )));
        }
        if self.render.link_host.trim().is_empty() || self.render.link_host.contains('/') {
            return Err(YoyakuError::Config(format!(
                "render.link_host must be a bare host name, got '{}'",
                self.render.link_host
            )));
        }
        Ok(())
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::YoyakuError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("yoyaku")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded output directory path.
    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.summary.model, "gpt-5-mini");
        assert_eq!(settings.summary.max_attempts, 8);
        assert_eq!(settings.transcript.languages, vec!["ja", "en", "en-US"]);
        assert_eq!(settings.storyboard.format_id, "sb0");
        assert_eq!(settings.render.match_config().max_images, 6);
        assert!(settings.check().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [summary]
            structured = true

            [render]
            link_host = "www.yout-ube.com"
            "#,
        )
        .unwrap();

        assert!(settings.summary.structured);
        assert_eq!(settings.summary.max_attempts, 8);
        assert_eq!(settings.render.link_host, "www.yout-ube.com");
        assert_eq!(settings.render.widen_window_seconds, 60);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.summary.detail = true;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert!(loaded.summary.detail);
        assert_eq!(loaded.general.output_dir, "~/yoyaku");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.summary.max_attempts, 8);
    }

    #[test]
    fn test_check_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.summary.max_attempts = 0;
        assert!(settings.check().is_err());

        let mut settings = Settings::default();
        settings.render.link_host = "https://example.com/".to_string();
        assert!(settings.check().is_err());

        let mut settings = Settings::default();
        settings.render.max_images = 10;
        assert!(settings.check().is_err());
        settings.render.max_images = 0;
        assert!(settings.check().is_ok());
    }
}
