//! Validate command implementation.

use super::read_summary;
use crate::cli::Output;
use crate::config::Settings;
use crate::render::Summary;
use crate::subtitle::{SubtitleCue, SubtitleIndex};
use crate::timestamp;
use crate::validate::{Distribution, DistributionValidator, Rejection};
use anyhow::Result;
use std::path::Path;

/// Run the distribution check matching the summary's shape.
pub(super) fn check_summary(
    summary: &Summary,
    cues: &[SubtitleCue],
    validator: &DistributionValidator,
) -> std::result::Result<Distribution, Rejection> {
    match summary {
        Summary::Freeform(lines) => validator.check_text(&lines.join("\n"), cues),
        Summary::Structured(s) => validator.check_sections(&s.timestamps(), cues),
    }
}

/// Run the validate command.
pub fn run_validate(
    summary_path: &str,
    subtitles_path: &str,
    structured: bool,
    min_coverage: Option<f64>,
    settings: &Settings,
) -> Result<()> {
    let summary = read_summary(Path::new(summary_path), structured)?;
    let index = SubtitleIndex::load(Path::new(subtitles_path))?;
    if index.is_empty() {
        Output::warning(&format!("No cues found in {}", subtitles_path));
    }

    let minimum = min_coverage.unwrap_or(settings.summary.min_coverage);
    let validator = DistributionValidator::new(minimum);

    Output::header("Timestamp check");
    Output::kv("Video length", &timestamp::format(index.total_duration()));
    Output::kv("Minimum coverage", &format!("{:.0}%", minimum * 100.0));

    match check_summary(&summary, index.cues(), &validator) {
        Ok(distribution) => {
            for t in &distribution.times {
                Output::list_item(&timestamp::format(*t));
            }
            Output::kv("Coverage", &format!("{:.0}%", distribution.coverage * 100.0));
            Output::success(&format!("Accepted ({} timestamps)", distribution.times.len()));
            Ok(())
        }
        Err(rejection) => {
            Output::error(&format!("Rejected: {}", rejection));
            Err(anyhow::anyhow!("summary rejected: {}", rejection))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{StructuredSection, StructuredSummary};

    fn cues() -> Vec<SubtitleCue> {
        vec![SubtitleCue::new(0.0, 600.0, "x".to_string())]
    }

    #[test]
    fn test_check_freeform() {
        let validator = DistributionValidator::default();
        let ok = Summary::freeform("## A（動画：0分10秒頃）\n## B（動画：6分00秒頃）");
        assert!(check_summary(&ok, &cues(), &validator).is_ok());

        let early = Summary::freeform("## A（動画：0分10秒頃）\n## B（動画：1分00秒頃）");
        assert!(matches!(
            check_summary(&early, &cues(), &validator),
            Err(Rejection::LowCoverage { .. })
        ));
    }

    #[test]
    fn test_check_structured() {
        let section = |t: u32| StructuredSection {
            heading: format!("s{}", t),
            timestamp_seconds: t,
            content: String::new(),
        };
        let summary = Summary::Structured(StructuredSummary {
            title: "t".to_string(),
            summary: "s".to_string(),
            sections: vec![section(400), section(10)],
        });
        let distribution = check_summary(&summary, &cues(), &DistributionValidator::default()).unwrap();
        assert_eq!(distribution.times.len(), 2);
    }
}
