//! CLI module for Yoyaku.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Yoyaku - illustrated, timestamped video summaries
///
/// Turns a YouTube video's subtitles into a navigable HTML summary with
/// storyboard thumbnails and deep links into the video.
#[derive(Parser, Debug)]
#[command(name = "yoyaku")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check system requirements and configuration
    Doctor,

    /// Summarize a video into an HTML page
    Summarize {
        /// YouTube URL or video ID
        input: String,

        /// Ask for the JSON section layout instead of Markdown
        #[arg(long)]
        structured: bool,

        /// Append a cleaned full transcript after the summary
        #[arg(long)]
        detail: bool,

        /// Skip the "動画のポイント" follow-up
        #[arg(long)]
        no_highlights: bool,

        /// Do not download storyboard thumbnails
        #[arg(long)]
        no_images: bool,

        /// Chat model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Maximum summary attempts before giving up
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Root output directory (one subdirectory per video)
        #[arg(short, long)]
        output_dir: Option<String>,
    },

    /// Render an existing summary file to HTML without calling the model
    Render {
        /// Summary text (Markdown lines) or JSON file
        #[arg(short, long)]
        summary: String,

        /// WebVTT subtitle file
        #[arg(long)]
        subtitles: Option<String>,

        /// Storyboard image manifest (JSON list of path/start/end)
        #[arg(short, long)]
        images: Option<String>,

        /// Deep-link prefix; seconds are appended (e.g. ".../watch?v=ID&t=")
        #[arg(short, long)]
        url_base: String,

        /// Output HTML path
        #[arg(short, long)]
        output: String,

        /// Page title
        #[arg(long)]
        title: Option<String>,

        /// Treat the summary as JSON (default: by .json extension)
        #[arg(long)]
        structured: bool,

        /// Reject the summary if its timestamps fail the distribution check
        #[arg(long)]
        validate: bool,
    },

    /// Check whether a summary's timestamps are usable
    Validate {
        /// Summary text (Markdown lines) or JSON file
        #[arg(short, long)]
        summary: String,

        /// WebVTT subtitle file
        #[arg(long)]
        subtitles: String,

        /// Treat the summary as JSON (default: by .json extension)
        #[arg(long)]
        structured: bool,

        /// Minimum ratio of last timestamp to video duration
        #[arg(long)]
        min_coverage: Option<f64>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_summarize() {
        let cli = Cli::parse_from(["yoyaku", "-vv", "summarize", "dQw4w9WgXcQ", "--structured", "--no-images"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Summarize {
                input,
                structured,
                no_images,
                detail,
                ..
            } => {
                assert_eq!(input, "dQw4w9WgXcQ");
                assert!(structured && no_images && !detail);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_render_requires_output() {
        assert!(Cli::try_parse_from(["yoyaku", "render", "-s", "a.txt", "-u", "x&t="]).is_err());
    }
}
