//! CLI command implementations.

mod config;
mod doctor;
mod render;
mod summarize;
mod validate;

pub use config::run_config;
pub use doctor::run_doctor;
pub use render::{run_render, RenderArgs};
pub use summarize::{run_summarize, SummarizeOverrides};
pub use validate::run_validate;

use crate::render::{StructuredSummary, Summary};
use anyhow::{Context, Result};
use std::path::Path;

/// Read a saved summary; JSON is assumed when `structured` is set or the
/// file ends in `.json`.
fn read_summary(path: &Path, structured: bool) -> Result<Summary> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let structured = structured || path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if structured {
        let value: serde_json::Value =
            serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path.display()))?;
        Ok(Summary::Structured(StructuredSummary::from_json(value)?))
    } else {
        Ok(Summary::freeform(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_summary_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("summary.txt");
        std::fs::write(&text, "## 導入（動画：0分10秒頃）\n本文").unwrap();
        assert!(matches!(read_summary(&text, false).unwrap(), Summary::Freeform(lines) if lines.len() == 2));

        let json = dir.path().join("summary.json");
        std::fs::write(
            &json,
            r#"{"title":"t","summary":"s","sections":[{"heading":"a","timestamp_seconds":5,"content":"c"}]}"#,
        )
        .unwrap();
        assert!(matches!(read_summary(&json, false).unwrap(), Summary::Structured(s) if s.sections.len() == 1));
    }

    #[test]
    fn test_read_summary_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.txt");
        std::fs::write(&path, "not json").unwrap();
        assert!(read_summary(&path, true).is_err());
    }
}
