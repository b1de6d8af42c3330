//! Terminal output for the CLI, kept apart from tracing logs.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Styled status lines. Progress goes to stdout, problems to stderr.
pub struct Output;

impl Output {
    pub fn info(msg: &str) {
        println!("{} {}", style("::").cyan().bold(), msg);
    }

    pub fn success(msg: &str) {
        println!("{} {}", style("✓").green().bold(), msg);
    }

    pub fn warning(msg: &str) {
        eprintln!("{} {}", style("!").yellow().bold(), msg);
    }

    pub fn error(msg: &str) {
        eprintln!("{} {}", style("✗").red().bold(), msg);
    }

    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Aligned `key: value` line.
    pub fn kv(key: &str, value: &str) {
        println!("  {:<10} {}", style(format!("{}:", key)).dim(), value);
    }

    pub fn list_item(msg: &str) {
        println!("  {} {}", style("-").cyan(), msg);
    }

    /// Spinner for a step that waits on the network or the model.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    }
}

/// `1h 02m 05s`, `2m 05s` or `42s`.
pub fn format_duration(seconds: u32) -> String {
    let (h, m, s) = (seconds / 3600, seconds % 3600 / 60, seconds % 60);
    match (h, m) {
        (0, 0) => format!("{}s", s),
        (0, _) => format!("{}m {:02}s", m, s),
        _ => format!("{}h {:02}m {:02}s", h, m, s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(42), "42s");
        assert_eq!(format_duration(125), "2m 05s");
        assert_eq!(format_duration(3725), "1h 02m 05s");
    }
}
