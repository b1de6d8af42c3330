//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Run the config command. `config_path` is the `--config` override.
pub fn run_config(action: &ConfigAction, settings: Settings, config_path: Option<PathBuf>) -> Result<()> {
    let path = config_path.unwrap_or_else(Settings::default_config_path);

    match action {
        ConfigAction::Show => {
            let rendered = toml::to_string_pretty(&settings).context("Failed to serialize settings")?;
            if !path.exists() {
                println!("# {} does not exist; showing defaults", path.display());
            }
            println!("{}", rendered);
        }
        ConfigAction::Edit => edit(&path, &settings)?,
        ConfigAction::Path => println!("{}", path.display()),
    }

    Ok(())
}

/// Open the file in `$EDITOR`, writing the current settings first if it is
/// missing, and re-read it afterwards so mistakes show up immediately.
fn edit(path: &Path, settings: &Settings) -> Result<()> {
    if !path.exists() {
        settings.save_to(&path.to_path_buf())?;
        Output::info(&format!("Wrote current settings to {}", path.display()));
    }

    let editor = std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .unwrap_or_else(|_| "vi".to_string());

    let status = std::process::Command::new(&editor)
        .arg(path)
        .status()
        .with_context(|| format!("Failed to start editor '{}'", editor))?;
    if !status.success() {
        Output::warning(&format!("{} exited with {}", editor, status));
        return Ok(());
    }

    match Settings::load_from(Some(&path.to_path_buf())) {
        Ok(_) => Output::success(&format!("Saved {}", path.display())),
        Err(e) => Output::error(&format!("{} no longer loads: {}", path.display(), e)),
    }
    Ok(())
}
