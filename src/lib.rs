//! Yoyaku - illustrated, timestamped video summaries
//!
//! A CLI tool that turns a YouTube video's subtitles into a navigable HTML
//! summary page.
//!
//! "Yoyaku" (要約) is Japanese for "summary."
//!
//! # Overview
//!
//! For one video, Yoyaku:
//! - Downloads the best subtitle track and the storyboard thumbnails
//! - Asks a chat model for a summary with a timestamp per section
//! - Throws away summaries whose timestamps are missing, repeated or stop
//!   too early, and asks again
//! - Renders an HTML page where every section links into the video and shows
//!   the thumbnails of its time range
//!
//! # Architecture
//!
//! - `config` - Configuration and prompt templates
//! - `source` - Video metadata and subtitle tracks (yt-dlp)
//! - `subtitle` - WebVTT parsing and the subtitle index
//! - `timestamp` - Parsing and formatting of timestamp phrases
//! - `storyboard` - Storyboard download, slicing and matching
//! - `summarize` - The chat model seam and the retry loop
//! - `validate` - Timestamp distribution check
//! - `render` - Summary partitioning and HTML output
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use yoyaku::config::Settings;
//! use yoyaku::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let result = orchestrator.summarize("dQw4w9WgXcQ").await?;
//!     println!("Wrote {}", result.html_path.display());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod render;
pub mod source;
pub mod storyboard;
pub mod subtitle;
pub mod summarize;
pub mod timestamp;
pub mod validate;

pub use error::{Result, YoyakuError};
