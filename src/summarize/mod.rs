//! Summary generation with distribution checks.
//!
//! The model is asked for a summary; if its timestamps are missing,
//! duplicated or stop too early, the whole conversation is discarded and a
//! fresh one is started. After `max_attempts` rejections the run fails with
//! [`YoyakuError::ValidationExhausted`] and nothing is rendered.

mod openai;

pub use openai::OpenAIModel;

use crate::config::Prompts;
use crate::error::{Result, YoyakuError};
use crate::render::{StructuredSummary, Summary};
use crate::subtitle::SubtitleCue;
use crate::validate::{Distribution, DistributionValidator};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One message of a conversation with the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A chat model able to write summaries.
///
/// Implementations should return [`YoyakuError::Summary`] for replies that
/// arrived but could not be understood; those are retried. Other errors end
/// the run.
#[async_trait]
pub trait SummaryModel: Send + Sync {
    /// Reply to a conversation.
    async fn complete(&self, messages: &[ChatTurn]) -> Result<String>;

    /// Reply to a single prompt with JSON matching `schema`.
    async fn complete_structured(&self, prompt: &str, schema: &serde_json::Value) -> Result<serde_json::Value>;
}

/// The video a summary is requested for.
#[derive(Debug, Clone, Copy)]
pub struct VideoContext<'a> {
    pub title: &'a str,
    /// Watch URL placed between the highlights and the summary.
    pub url: Option<&'a str>,
    /// Subtitle file content as sent to the model.
    pub transcript: &'a str,
    pub cues: &'a [SubtitleCue],
}

/// An accepted summary.
#[derive(Debug, Clone)]
pub struct Accepted {
    pub summary: Summary,
    /// Attempts used, including the accepted one.
    pub attempts: u32,
    pub distribution: Distribution,
}

/// Runs the bounded request/validate loop against a [`SummaryModel`].
pub struct Summarizer {
    model: Arc<dyn SummaryModel>,
    prompts: Prompts,
    validator: DistributionValidator,
    max_attempts: u32,
    highlights: bool,
}

impl Summarizer {
    pub fn new(model: Arc<dyn SummaryModel>) -> Self {
        Self {
            model,
            prompts: Prompts::default(),
            validator: DistributionValidator::default(),
            max_attempts: 8,
            highlights: true,
        }
    }

    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_validator(mut self, validator: DistributionValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Values below 1 are raised to 1.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_highlights(mut self, highlights: bool) -> Self {
        self.highlights = highlights;
        self
    }

    /// Dispatch on the requested layout.
    pub async fn summarize(&self, video: VideoContext<'_>, structured: bool) -> Result<Accepted> {
        if structured {
            self.summarize_structured(video).await
        } else {
            self.summarize_freeform(video).await
        }
    }

    /// Markdown summary, optionally prefixed with the highlights follow-up.
    #[instrument(skip(self, video), fields(title = %video.title))]
    pub async fn summarize_freeform(&self, video: VideoContext<'_>) -> Result<Accepted> {
        let prompt = self
            .prompts
            .for_video(&self.prompts.summary.user, video.title, video.transcript);

        for attempt in 1..=self.max_attempts {
            info!("Requesting summary (attempt {}/{})", attempt, self.max_attempts);

            // Every attempt starts a new conversation
            let mut conversation = vec![ChatTurn::user(prompt.clone())];
            let reply = match self.model.complete(&conversation).await {
                Ok(reply) => reply,
                Err(YoyakuError::Summary(e)) => {
                    warn!("Attempt {} returned an unusable reply: {}", attempt, e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let distribution = match self.validator.check_text(&reply, video.cues) {
                Ok(d) => d,
                Err(rejection) => {
                    warn!("Attempt {} rejected: {}", attempt, rejection);
                    continue;
                }
            };
            info!(
                "Summary accepted with {} timestamps covering {:.0}%",
                distribution.times.len(),
                distribution.coverage * 100.0
            );

            conversation.push(ChatTurn::assistant(reply.clone()));
            let highlights = self.highlights(&mut conversation).await;

            return Ok(Accepted {
                summary: Summary::Freeform(assemble_lines(highlights.as_deref(), video.url, &reply)),
                attempts: attempt,
                distribution,
            });
        }

        Err(YoyakuError::ValidationExhausted {
            attempts: self.max_attempts,
        })
    }

    /// JSON summary; sections are checked by their maximum timestamp.
    #[instrument(skip(self, video), fields(title = %video.title))]
    pub async fn summarize_structured(&self, video: VideoContext<'_>) -> Result<Accepted> {
        let prompt = self
            .prompts
            .for_video(&self.prompts.structured.user, video.title, video.transcript);
        let schema = StructuredSummary::schema();

        for attempt in 1..=self.max_attempts {
            info!("Requesting structured summary (attempt {}/{})", attempt, self.max_attempts);

            let parsed = match self.model.complete_structured(&prompt, &schema).await {
                Ok(value) => StructuredSummary::from_json(value),
                Err(e) => Err(e),
            };
            let summary = match parsed {
                Ok(summary) => summary,
                Err(YoyakuError::Summary(e)) => {
                    warn!("Attempt {} returned malformed JSON: {}", attempt, e);
                    continue;
                }
                Err(YoyakuError::Json(e)) => {
                    warn!("Attempt {} returned malformed JSON: {}", attempt, e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            match self.validator.check_sections(&summary.timestamps(), video.cues) {
                Ok(distribution) => {
                    info!(
                        "Structured summary accepted with {} sections covering {:.0}%",
                        summary.sections.len(),
                        distribution.coverage * 100.0
                    );
                    return Ok(Accepted {
                        summary: Summary::Structured(summary),
                        attempts: attempt,
                        distribution,
                    });
                }
                Err(rejection) => warn!("Attempt {} rejected: {}", attempt, rejection),
            }
        }

        Err(YoyakuError::ValidationExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Cleaned full transcript for the detail block.
    #[instrument(skip(self, video), fields(title = %video.title))]
    pub async fn detail(&self, video: VideoContext<'_>) -> Result<String> {
        let prompt = self
            .prompts
            .for_video(&self.prompts.detail.user, video.title, video.transcript);
        let text = self.model.complete(&[ChatTurn::user(prompt)]).await?;
        debug!("Detail text: {} chars", text.chars().count());
        Ok(text)
    }

    /// Ask for highlights in the accepted conversation. A failure here only
    /// loses the highlights.
    async fn highlights(&self, conversation: &mut Vec<ChatTurn>) -> Option<String> {
        if !self.highlights {
            return None;
        }
        conversation.push(ChatTurn::user(self.prompts.summary.highlights.clone()));
        match self.model.complete(conversation).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Highlights request failed, continuing without: {}", e);
                None
            }
        }
    }
}

/// Highlights, a blank line and the video URL, then the summary.
fn assemble_lines(highlights: Option<&str>, url: Option<&str>, summary: &str) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(h) = highlights {
        lines.extend(h.lines().map(str::to_string));
        lines.push(String::new());
    }
    if let Some(url) = url {
        lines.push(url.to_string());
    }
    lines.extend(summary.lines().map(str::to_string));
    lines
}
