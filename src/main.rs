//! Yoyaku CLI entry point.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use yoyaku::cli::commands::{self, RenderArgs, SummarizeOverrides};
use yoyaku::cli::{Cli, Commands};
use yoyaku::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("yoyaku={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let config_path = cli.config.as_deref().map(PathBuf::from);
    let settings = match &config_path {
        Some(path) => Settings::load_from(Some(path))?,
        None => Settings::load()?,
    };

    // Execute command
    match &cli.command {
        Commands::Doctor => {
            commands::run_doctor(&settings, config_path.as_deref())?;
        }

        Commands::Summarize {
            input,
            structured,
            detail,
            no_highlights,
            no_images,
            model,
            max_attempts,
            output_dir,
        } => {
            let overrides = SummarizeOverrides {
                structured: *structured,
                detail: *detail,
                no_highlights: *no_highlights,
                no_images: *no_images,
                model: model.clone(),
                max_attempts: *max_attempts,
                output_dir: output_dir.clone(),
            };
            commands::run_summarize(input, &overrides, settings).await?;
        }

        Commands::Render {
            summary,
            subtitles,
            images,
            url_base,
            output,
            title,
            structured,
            validate,
        } => {
            let args = RenderArgs {
                summary: summary.clone(),
                subtitles: subtitles.clone(),
                images: images.clone(),
                url_base: url_base.clone(),
                output: output.clone(),
                title: title.clone(),
                structured: *structured,
                validate: *validate,
            };
            commands::run_render(&args, &settings)?;
        }

        Commands::Validate {
            summary,
            subtitles,
            structured,
            min_coverage,
        } => {
            commands::run_validate(summary, subtitles, *structured, *min_coverage, &settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, config_path)?;
        }
    }

    Ok(())
}
