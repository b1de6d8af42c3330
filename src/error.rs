//! Error types for Yoyaku.

use thiserror::Error;

/// Library-level error type for Yoyaku operations.
#[derive(Error, Debug)]
pub enum YoyakuError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Subtitle error: {0}")]
    Subtitle(String),

    #[error("Transcript acquisition failed: {0}")]
    Transcript(String),

    #[error("Storyboard error: {0}")]
    Storyboard(String),

    #[error("Summary generation failed: {0}")]
    Summary(String),

    #[error("Summary rejected after {attempts} attempts: timestamps were missing, duplicated or poorly distributed")]
    ValidationExhausted { attempts: u32 },

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Yoyaku operations.
pub type Result<T> = std::result::Result<T, YoyakuError>;
