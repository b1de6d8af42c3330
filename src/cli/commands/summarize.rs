//! Summarize command implementation.

use crate::cli::output::format_duration;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Command-line overrides applied on top of the loaded settings.
#[derive(Debug, Default, Clone)]
pub struct SummarizeOverrides {
    pub structured: bool,
    pub detail: bool,
    pub no_highlights: bool,
    pub no_images: bool,
    pub model: Option<String>,
    pub max_attempts: Option<u32>,
    pub output_dir: Option<String>,
}

impl SummarizeOverrides {
    fn apply(&self, settings: &mut Settings) {
        if self.structured {
            settings.summary.structured = true;
        }
        if self.detail {
            settings.summary.detail = true;
        }
        if self.no_highlights {
            settings.summary.highlights = false;
        }
        if self.no_images {
            settings.storyboard.enabled = false;
        }
        if let Some(model) = &self.model {
            settings.summary.model = model.clone();
        }
        if let Some(max) = self.max_attempts {
            settings.summary.max_attempts = max.max(1);
        }
        if let Some(dir) = &self.output_dir {
            settings.general.output_dir = dir.clone();
        }
    }
}

/// Run the summarize command.
pub async fn run_summarize(input: &str, overrides: &SummarizeOverrides, mut settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Summarize) {
        Output::error(&format!("{}", e));
        Output::info("Run 'yoyaku doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    overrides.apply(&mut settings);
    Output::info(&format!("Processing: {}", input));

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Summarizing...");
    let outcome = orchestrator.summarize(input).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(result) => {
            Output::success(&format!("Summarized '{}'", result.title));
            Output::kv("Page", &result.html_path.display().to_string());
            Output::kv("Backup", &result.backup_path.display().to_string());
            Output::kv(
                "Subtitles",
                &format!("{} ({})", result.subtitle_path.display(), result.subtitle_language),
            );
            Output::kv("Sections", &result.sections.to_string());
            Output::kv("Images", &result.images.to_string());
            Output::kv("Attempts", &result.attempts.to_string());
            Output::kv("Coverage", &format!("{:.0}%", result.coverage * 100.0));
            Output::kv("Duration", &format_duration(result.duration_seconds));
        }
        Err(e) => {
            Output::error(&format!("Failed to summarize: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply() {
        let mut settings = Settings::default();
        let overrides = SummarizeOverrides {
            structured: true,
            no_highlights: true,
            no_images: true,
            model: Some("gpt-4o".to_string()),
            max_attempts: Some(0),
            output_dir: Some("/tmp/out".to_string()),
            ..Default::default()
        };
        overrides.apply(&mut settings);

        assert!(settings.summary.structured);
        assert!(!settings.summary.detail);
        assert!(!settings.summary.highlights);
        assert!(!settings.storyboard.enabled);
        assert_eq!(settings.summary.model, "gpt-4o");
        assert_eq!(settings.summary.max_attempts, 1);
        assert_eq!(settings.general.output_dir, "/tmp/out");
    }

    #[test]
    fn test_no_overrides_keep_settings() {
        let mut settings = Settings::default();
        SummarizeOverrides::default().apply(&mut settings);
        assert!(settings.summary.highlights);
        assert!(settings.storyboard.enabled);
        assert_eq!(settings.summary.max_attempts, 8);
    }
}
