//! Pipeline orchestrator for Yoyaku.
//!
//! Coordinates the entire process from subtitle download to the written page.

use crate::config::{Prompts, Settings};
use crate::error::{Result, YoyakuError};
use crate::render::{render, RenderOptions};
use crate::source::{sanitize_title, TranscriptSource, VideoInfo, YoutubeSource};
use crate::storyboard::{save_manifest, ImageCandidate, StoryboardFetcher, StoryboardFormat};
use crate::subtitle::SubtitleIndex;
use crate::summarize::{OpenAIModel, Summarizer, SummaryModel, VideoContext};
use crate::validate::DistributionValidator;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use url::Url;

/// File name of the storyboard manifest next to the page.
pub const MANIFEST_FILE: &str = "images.json";

/// The main orchestrator for the Yoyaku pipeline.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    source: Arc<dyn TranscriptSource>,
    model: Arc<dyn SummaryModel>,
    storyboards: StoryboardFetcher,
}

/// Outcome of [`Orchestrator::summarize`].
#[derive(Debug, Clone)]
pub struct SummarizeResult {
    pub video_id: String,
    pub title: String,
    pub html_path: PathBuf,
    pub backup_path: PathBuf,
    pub subtitle_path: PathBuf,
    pub subtitle_language: String,
    pub images: usize,
    pub sections: usize,
    pub duration_seconds: u32,
    pub attempts: u32,
    pub coverage: f64,
}

impl Orchestrator {
    /// Create a new orchestrator using yt-dlp and OpenAI.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;
        let source = Arc::new(YoutubeSource::new(settings.transcript.languages.clone()));

        info!("Using model {}", settings.summary.model);
        let model = Arc::new(OpenAIModel::new(&settings.summary.model)?);

        Ok(Self::with_components(settings, prompts, source, model))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        source: Arc<dyn TranscriptSource>,
        model: Arc<dyn SummaryModel>,
    ) -> Self {
        Self {
            settings,
            prompts,
            source,
            model,
            storyboards: StoryboardFetcher::new(),
        }
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// A summarizer configured from the settings.
    pub fn summarizer(&self) -> Summarizer {
        Summarizer::new(self.model.clone())
            .with_prompts(self.prompts.clone())
            .with_validator(DistributionValidator::new(self.settings.summary.min_coverage))
            .with_max_attempts(self.settings.summary.max_attempts)
            .with_highlights(self.settings.summary.highlights)
    }

    /// Fetch, summarize and render one video.
    #[instrument(skip(self), fields(input = %input))]
    pub async fn summarize(&self, input: &str) -> Result<SummarizeResult> {
        let video = self.source.fetch_info(input).await?;

        let name = match sanitize_title(&video.title) {
            n if n.is_empty() => video.id.clone(),
            n => n,
        };
        let out_dir = self.settings.output_dir().join(&name);
        std::fs::create_dir_all(&out_dir)?;
        info!("Output directory: {}", out_dir.display());

        let transcript = self.source.fetch_transcript(&video).await?;
        let index = SubtitleIndex::from_cues(transcript.cues);
        let subtitle_path = out_dir.join(format!("{}.vtt", name));
        let vtt = index.raw_text();
        std::fs::write(&subtitle_path, &vtt)?;
        info!(
            "Saved {} cues ({}s) to {}",
            index.cues().len(),
            index.total_duration(),
            subtitle_path.display()
        );

        let images = if self.settings.storyboard.enabled {
            self.fetch_storyboard(&video, &out_dir).await
        } else {
            Vec::new()
        };

        let summarizer = self.summarizer();
        let context = VideoContext {
            title: &video.title,
            url: Some(&video.url),
            transcript: &vtt,
            cues: index.cues(),
        };

        let accepted = summarizer.summarize(context, self.settings.summary.structured).await?;

        let detail_text = if self.settings.summary.detail {
            match summarizer.detail(context).await {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!("Detail text failed, rendering without it: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let options = self.render_options(&video, images, &out_dir, detail_text)?;
        let image_count = options.images.len();
        let document = render(&accepted.summary, index.cues(), &options)?;

        let html_path = out_dir.join(format!("{}.html", name));
        let backup_path = document.write(&html_path)?;

        Ok(SummarizeResult {
            video_id: video.id,
            title: video.title,
            html_path,
            backup_path,
            subtitle_path,
            subtitle_language: transcript.language,
            images: image_count,
            sections: document.sections.len(),
            duration_seconds: index.total_duration(),
            attempts: accepted.attempts,
            coverage: accepted.distribution.coverage,
        })
    }

    /// Storyboard frames for `video`, saved under `out_dir/images`. Any
    /// failure yields no images.
    async fn fetch_storyboard(&self, video: &VideoInfo, out_dir: &Path) -> Vec<ImageCandidate> {
        let format_id = &self.settings.storyboard.format_id;
        let Some(format) = StoryboardFormat::from_info(&video.raw, format_id) else {
            warn!("No storyboard format {} for {}", format_id, video.id);
            return Vec::new();
        };

        match self.storyboards.fetch(&format, &video.id, &out_dir.join("images")).await {
            Ok(images) => {
                if let Err(e) = save_manifest(&out_dir.join(MANIFEST_FILE), &images) {
                    warn!("Could not save image manifest: {}", e);
                }
                images
            }
            Err(e) => {
                warn!("Storyboard download failed, continuing without images: {}", e);
                Vec::new()
            }
        }
    }

    fn render_options(
        &self,
        video: &VideoInfo,
        images: Vec<ImageCandidate>,
        out_dir: &Path,
        detail_text: Option<String>,
    ) -> Result<RenderOptions> {
        let render = &self.settings.render;
        let mut options = RenderOptions::new(link_base(&render.link_host, &video.id)?);
        options.images = images;
        options.match_config = render.match_config();
        options.subtitle_excerpts = render.subtitle_excerpts;
        options.html_dir = Some(out_dir.to_path_buf());
        options.title = Some(video.title.clone());
        options.thumbnail_url = video.thumbnail_url.clone();
        options.detail_text = detail_text;
        if render.preview_script {
            options.preview_embed_base = Some(embed_base(&render.link_host, &video.id)?);
        }
        Ok(options)
    }
}

/// Deep-link prefix `https://<host>/watch?v=<id>&t=`; append seconds.
pub fn link_base(host: &str, video_id: &str) -> Result<String> {
    let url = Url::parse_with_params(&format!("https://{}/watch", host), &[("v", video_id)])
        .map_err(|e| YoyakuError::InvalidInput(format!("Bad link host '{}': {}", host, e)))?;
    Ok(format!("{}&t=", url))
}

/// Embedded player prefix `https://<host>/embed/<id>?autoplay=1&start=`.
pub fn embed_base(host: &str, video_id: &str) -> Result<String> {
    let mut url = Url::parse(&format!("https://{}/", host))
        .map_err(|e| YoyakuError::InvalidInput(format!("Bad link host '{}': {}", host, e)))?;
    url.set_path(&format!("embed/{}", video_id));
    url.query_pairs_mut().append_pair("autoplay", "1");
    Ok(format!("{}&start=", url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_base() {
        assert_eq!(
            link_base("www.youtube.com", "dQw4w9WgXcQ").unwrap(),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t="
        );
        assert_eq!(
            link_base("www.yout-ube.com", "abc").unwrap(),
            "https://www.yout-ube.com/watch?v=abc&t="
        );
        assert!(link_base("bad host", "abc").is_err());
    }

    #[test]
    fn test_embed_base() {
        assert_eq!(
            embed_base("www.youtube.com", "abc").unwrap(),
            "https://www.youtube.com/embed/abc?autoplay=1&start="
        );
    }
}
