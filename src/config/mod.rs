//! Configuration module for Yoyaku.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{DetailPrompts, Prompts, StructuredPrompts, SummaryPrompts};
pub use settings::{
    GeneralSettings, PromptSettings, RenderSettings, Settings, StoryboardSettings, SummarySettings,
    TranscriptSettings,
};
