//! Doctor command - verify that a summary run can succeed.

use crate::cli::Output;
use crate::config::{Prompts, Settings};
use console::style;
use std::path::Path;
use std::process::Command;

/// Outcome of a single check.
#[derive(Debug)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            status: CheckStatus::Ok,
            message: message.into(),
            hint: None,
        }
    }

    fn warning(name: &'static str, message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name,
            status: CheckStatus::Warning,
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    fn error(name: &'static str, message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name,
            status: CheckStatus::Error,
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };
        println!("  {} {} - {}", icon, style(self.name).bold(), self.message);
        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks. Exits with status 1 when any check fails.
pub fn run_doctor(settings: &Settings, config_path: Option<&Path>) -> anyhow::Result<()> {
    Output::header("Yoyaku Doctor");
    println!();

    let default_path = Settings::default_config_path();
    let groups = [
        ("External Tools", vec![check_ytdlp()]),
        ("API Configuration", vec![check_openai_api_key()]),
        ("Output", vec![check_output_dir(settings)]),
        (
            "Configuration",
            vec![
                check_config_file(config_path.unwrap_or(&default_path)),
                check_settings(settings),
                check_prompts(settings),
            ],
        ),
    ];

    for (title, checks) in &groups {
        println!("{}", style(title).bold());
        checks.iter().for_each(CheckResult::print);
        println!();
    }

    let count = |status: CheckStatus| {
        groups
            .iter()
            .flat_map(|(_, checks)| checks)
            .filter(|c| c.status == status)
            .count()
    };

    match (count(CheckStatus::Error), count(CheckStatus::Warning)) {
        (0, 0) => Output::success("Ready to summarize."),
        (0, warnings) => Output::warning(&format!("Ready, with {} warning(s).", warnings)),
        (errors, _) => {
            Output::error(&format!("{} problem(s) must be fixed before 'yoyaku summarize' can run.", errors));
            std::process::exit(1);
        }
    }

    Ok(())
}

/// yt-dlp fetches metadata, subtitles and storyboard formats.
fn check_ytdlp() -> CheckResult {
    const NAME: &str = "yt-dlp";
    match Command::new("yt-dlp").arg("--version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
            CheckResult::ok(NAME, format!("version {}", version))
        }
        Ok(_) => CheckResult::error(NAME, "installed but `--version` failed", ytdlp_hint()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => CheckResult::error(NAME, "not found in PATH", ytdlp_hint()),
        Err(e) => CheckResult::error(NAME, format!("could not run: {}", e), ytdlp_hint()),
    }
}

fn check_openai_api_key() -> CheckResult {
    const NAME: &str = "OPENAI_API_KEY";
    const HINT: &str = "Set with: export OPENAI_API_KEY='sk-...'";

    let key = std::env::var(NAME).unwrap_or_default();
    let key = key.trim();
    if key.is_empty() {
        return CheckResult::error(NAME, "not set", HINT);
    }
    if !key.starts_with("sk-") {
        return CheckResult::warning(NAME, "set, but does not start with sk-", HINT);
    }
    CheckResult::ok(NAME, format!("configured ({})", mask(key)))
}

/// First seven and last four characters of a secret.
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 11 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn check_output_dir(settings: &Settings) -> CheckResult {
    const NAME: &str = "Output directory";
    let dir = settings.output_dir();

    if dir.is_dir() {
        let videos = std::fs::read_dir(&dir)
            .map(|entries| entries.filter_map(|e| e.ok()).filter(|e| e.path().is_dir()).count())
            .unwrap_or(0);
        CheckResult::ok(NAME, format!("{} ({} videos)", dir.display(), videos))
    } else if dir.exists() {
        CheckResult::error(
            NAME,
            format!("{} is not a directory", dir.display()),
            "Point general.output_dir at a directory",
        )
    } else {
        CheckResult::warning(
            NAME,
            format!("{} (will be created)", dir.display()),
            "Created on the first summary",
        )
    }
}

fn check_config_file(path: &Path) -> CheckResult {
    if path.exists() {
        CheckResult::ok("Config file", path.display().to_string())
    } else {
        CheckResult::warning("Config file", "using defaults", "Create with: yoyaku config edit")
    }
}

fn check_settings(settings: &Settings) -> CheckResult {
    match settings.check() {
        Ok(()) => CheckResult::ok(
            "Settings",
            format!(
                "model {}, up to {} attempts, links to {}",
                settings.summary.model, settings.summary.max_attempts, settings.render.link_host
            ),
        ),
        Err(e) => CheckResult::error("Settings", e.to_string(), "Fix with: yoyaku config edit"),
    }
}

/// Custom prompt files must parse, or every summary run fails.
fn check_prompts(settings: &Settings) -> CheckResult {
    let custom_dir = settings.prompts.custom_dir.as_deref();
    match (Prompts::load(custom_dir, Some(&settings.prompts.variables)), custom_dir) {
        (Ok(_), Some(dir)) => CheckResult::ok("Prompts", format!("custom ({})", dir)),
        (Ok(_), None) => CheckResult::ok("Prompts", "built-in"),
        (Err(e), _) => CheckResult::error("Prompts", e.to_string(), "Check the TOML files in prompts.custom_dir"),
    }
}

fn ytdlp_hint() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install yt-dlp"
    } else if cfg!(target_os = "windows") {
        "Install with: winget install yt-dlp"
    } else {
        "Install with: pip install yt-dlp (or your package manager)"
    }
}
