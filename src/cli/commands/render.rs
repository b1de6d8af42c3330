//! Render command implementation.

use super::read_summary;
use super::validate::check_summary;
use crate::cli::Output;
use crate::config::Settings;
use crate::render::{render, RenderOptions};
use crate::storyboard::load_manifest;
use crate::subtitle::SubtitleIndex;
use crate::validate::DistributionValidator;
use anyhow::Result;
use std::path::Path;

/// Arguments of the render command.
#[derive(Debug, Clone)]
pub struct RenderArgs {
    pub summary: String,
    pub subtitles: Option<String>,
    pub images: Option<String>,
    pub url_base: String,
    pub output: String,
    pub title: Option<String>,
    pub structured: bool,
    pub validate: bool,
}

/// Run the render command.
pub fn run_render(args: &RenderArgs, settings: &Settings) -> Result<()> {
    let summary = read_summary(Path::new(&args.summary), args.structured)?;

    let index = match &args.subtitles {
        Some(path) => SubtitleIndex::load(Path::new(path))?,
        None => SubtitleIndex::default(),
    };

    if args.validate {
        let validator = DistributionValidator::new(settings.summary.min_coverage);
        if let Err(rejection) = check_summary(&summary, index.cues(), &validator) {
            Output::error(&format!("Summary rejected: {}", rejection));
            return Err(anyhow::anyhow!("summary rejected: {}", rejection));
        }
    }

    let output = Path::new(&args.output);
    let mut options = RenderOptions::new(args.url_base.clone());
    options.match_config = settings.render.match_config();
    options.subtitle_excerpts = settings.render.subtitle_excerpts;
    options.html_dir = output
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf);
    options.title = args.title.clone();
    if let Some(path) = &args.images {
        options.images = load_manifest(Path::new(path))?;
    }

    let document = render(&summary, index.cues(), &options)?;
    let backup = document.write(output)?;

    Output::success(&format!("Rendered {} sections", document.sections.len()));
    Output::kv("Page", &output.display().to_string());
    Output::kv("Backup", &backup.display().to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(dir: &Path, validate: bool) -> RenderArgs {
        RenderArgs {
            summary: dir.join("summary.txt").display().to_string(),
            subtitles: Some(dir.join("subs.vtt").display().to_string()),
            images: None,
            url_base: "https://www.youtube.com/watch?v=abc&t=".to_string(),
            output: dir.join("out").join("page.html").display().to_string(),
            title: Some("テスト".to_string()),
            structured: false,
            validate,
        }
    }

    fn write_inputs(dir: &Path, summary: &str) {
        std::fs::write(dir.join("summary.txt"), summary).unwrap();
        std::fs::write(
            dir.join("subs.vtt"),
            "WEBVTT\n\n00:00:00.000 --> 00:05:00.000\n前半\n\n00:05:00.000 --> 00:10:00.000\n後半\n",
        )
        .unwrap();
    }

    #[test]
    fn test_render_writes_page_and_backup() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path(), "## 導入（動画：0分10秒頃）\n本文\n## まとめ（動画：8分00秒頃）");

        run_render(&args(dir.path(), true), &Settings::default()).unwrap();

        let html = std::fs::read_to_string(dir.path().join("out/page.html")).unwrap();
        assert!(html.contains("<title>テスト</title>"));
        assert_eq!(html.matches("class='timestamp-section'").count(), 2);
        assert!(dir.path().join("out/page.html.txt").exists());
    }

    #[test]
    fn test_render_validate_rejects() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path(), "## 導入（動画：0分10秒頃）");

        assert!(run_render(&args(dir.path(), true), &Settings::default()).is_err());
        assert!(!dir.path().join("out/page.html").exists());
        assert!(run_render(&args(dir.path(), false), &Settings::default()).is_ok());
    }
}
