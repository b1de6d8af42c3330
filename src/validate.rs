//! Distribution check for model-written summaries.
//!
//! A summary is only accepted when its timestamps are usable for navigation:
//! there must be some, no two may be equal, and the last one must reach at
//! least halfway into the video. A summary failing the check is thrown away
//! and regenerated from scratch.

use crate::subtitle::{total_duration, SubtitleCue};
use crate::timestamp;
use std::fmt;

/// Default minimum ratio of last timestamp to video duration.
pub const DEFAULT_MIN_COVERAGE: f64 = 0.5;

/// Why a summary was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// No timestamp phrase was found.
    NoTimestamps,
    /// The structured summary has fewer than two sections.
    TooFewSections(usize),
    /// The same second appears more than once.
    DuplicateTimestamp(u32),
    /// The subtitle track has no duration to compare against.
    UnknownDuration,
    /// The timestamps stop too early in the video.
    LowCoverage { coverage: f64, minimum: f64 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoTimestamps => write!(f, "no timestamps found"),
            Rejection::TooFewSections(n) => write!(f, "only {} section(s)", n),
            Rejection::DuplicateTimestamp(sec) => write!(f, "timestamp {}s appears more than once", sec),
            Rejection::UnknownDuration => write!(f, "subtitle duration is zero"),
            Rejection::LowCoverage { coverage, minimum } => write!(
                f,
                "timestamps cover {:.0}% of the video (minimum {:.0}%)",
                coverage * 100.0,
                minimum * 100.0
            ),
        }
    }
}

/// Summary of an accepted timestamp distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub times: Vec<u32>,
    pub total_duration: u32,
    pub coverage: f64,
}

/// Checks timestamp distribution against the subtitle duration.
#[derive(Debug, Clone, Copy)]
pub struct DistributionValidator {
    min_coverage: f64,
}

impl DistributionValidator {
    pub fn new(min_coverage: f64) -> Self {
        Self { min_coverage }
    }

    /// Check a freeform summary; coverage is measured at its last timestamp.
    pub fn check_text(&self, text: &str, cues: &[SubtitleCue]) -> Result<Distribution, Rejection> {
        let lines: Vec<&str> = text.lines().collect();
        let times: Vec<u32> = timestamp::extract_all(&lines).into_iter().map(|(_, t)| t).collect();
        let reach = times.last().copied();
        self.check_times(times, reach, cues)
    }

    /// Check section timestamps of a structured summary; coverage is measured
    /// at the latest timestamp.
    pub fn check_sections(&self, times: &[u32], cues: &[SubtitleCue]) -> Result<Distribution, Rejection> {
        if times.len() < 2 {
            return Err(Rejection::TooFewSections(times.len()));
        }
        let reach = times.iter().max().copied();
        self.check_times(times.to_vec(), reach, cues)
    }

    fn check_times(
        &self,
        times: Vec<u32>,
        reach: Option<u32>,
        cues: &[SubtitleCue],
    ) -> Result<Distribution, Rejection> {
        let reach = reach.ok_or(Rejection::NoTimestamps)?;

        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = times.iter().find(|t| !seen.insert(**t)) {
            return Err(Rejection::DuplicateTimestamp(*dup));
        }

        let total = total_duration(cues);
        if total == 0 {
            return Err(Rejection::UnknownDuration);
        }

        let coverage = reach as f64 / total as f64;
        if coverage < self.min_coverage {
            return Err(Rejection::LowCoverage {
                coverage,
                minimum: self.min_coverage,
            });
        }

        Ok(Distribution {
            times,
            total_duration: total,
            coverage,
        })
    }

    /// `true` when the freeform summary passes the check.
    pub fn validate(&self, text: &str, cues: &[SubtitleCue]) -> bool {
        self.check_text(text, cues).is_ok()
    }
}

impl Default for DistributionValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_COVERAGE)
    }
}

/// Validate a freeform summary with the default coverage threshold.
pub fn validate(text: &str, cues: &[SubtitleCue]) -> bool {
    DistributionValidator::default().validate(text, cues)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cues_until(end: f64) -> Vec<SubtitleCue> {
        vec![
            SubtitleCue::new(0.0, 5.0, "start".to_string()),
            SubtitleCue::new(end - 5.0, end, "end".to_string()),
        ]
    }

    #[test]
    fn test_duplicate_rejected() {
        let text = "## A（動画：5分00秒頃）\n本文\n## B\n動画：5分00秒頃\n## C（動画：15分00秒頃）";
        let validator = DistributionValidator::default();
        assert_eq!(
            validator.check_text(text, &cues_until(1000.0)),
            Err(Rejection::DuplicateTimestamp(300))
        );
        assert!(!validate(text, &cues_until(1000.0)));
    }

    #[test]
    fn test_coverage_threshold() {
        let cues = cues_until(1000.0);
        let low = "## A（動画：0分10秒頃）\n## B（動画：6分40秒頃）";
        let ok = "## A（動画：0分10秒頃）\n## B（動画：10分00秒頃）";

        assert!(matches!(
            DistributionValidator::default().check_text(low, &cues),
            Err(Rejection::LowCoverage { .. })
        ));
        assert!(!validate(low, &cues));

        let dist = DistributionValidator::default().check_text(ok, &cues).unwrap();
        assert_eq!(dist.times, vec![10, 600]);
        assert_eq!(dist.total_duration, 1000);
        assert!((dist.coverage - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_no_timestamps_rejected() {
        assert_eq!(
            DistributionValidator::default().check_text("# 要約\n本文のみ", &cues_until(100.0)),
            Err(Rejection::NoTimestamps)
        );
    }

    #[test]
    fn test_zero_duration_rejected() {
        assert_eq!(
            DistributionValidator::default().check_text("動画：0分10秒頃", &[]),
            Err(Rejection::UnknownDuration)
        );
    }

    #[test]
    fn test_freeform_uses_last_timestamp() {
        // The maximum reaches 90%, but the last line only 10%
        let text = "動画：15分00秒頃\n動画：1分40秒頃";
        assert!(!validate(text, &cues_until(1000.0)));
    }

    #[test]
    fn test_sections_use_maximum() {
        let validator = DistributionValidator::default();
        let cues = cues_until(1000.0);
        assert!(validator.check_sections(&[900, 100], &cues).is_ok());
        assert_eq!(validator.check_sections(&[900], &cues), Err(Rejection::TooFewSections(1)));
        assert_eq!(
            validator.check_sections(&[100, 100, 900], &cues),
            Err(Rejection::DuplicateTimestamp(100))
        );
    }
}
