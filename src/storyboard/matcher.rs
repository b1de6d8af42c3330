//! Picking storyboard frames for a section's time range.

use super::ImageCandidate;

/// Upper bound on images per section; the page grid has this many columns.
pub const MAX_IMAGES: usize = 6;

/// Limits for [`match_images`].
#[derive(Debug, Clone, Copy)]
pub struct MatchConfig {
    /// Maximum images per section, capped at [`MAX_IMAGES`].
    pub max_images: usize,
    /// Range length used when the section has no known end.
    pub default_span_seconds: f64,
    /// Half-width of the proximity window used to fill up short results.
    pub widen_window_seconds: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_images: MAX_IMAGES,
            default_span_seconds: 300.0,
            widen_window_seconds: 60.0,
        }
    }
}

/// Select up to `max_images` (never more than [`MAX_IMAGES`]) candidates for `[start, end]`, sorted by start.
///
/// Candidates overlapping the range come first. When there are too few, the
/// remaining slots are filled with the candidates closest to `start` within
/// the widening window, and the combined set is re-sorted by start time.
pub fn match_images(
    start: f64,
    end: Option<f64>,
    candidates: &[ImageCandidate],
    config: &MatchConfig,
) -> Vec<ImageCandidate> {
    let max_images = config.max_images.min(MAX_IMAGES);
    if candidates.is_empty() || max_images == 0 {
        return Vec::new();
    }

    let effective_end = end.unwrap_or(start + config.default_span_seconds);

    let mut selected: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.start <= effective_end && c.end >= start)
        .map(|(i, _)| i)
        .collect();
    selected.sort_by(|&a, &b| candidates[a].start.total_cmp(&candidates[b].start));

    if selected.len() < max_images {
        let window = config.widen_window_seconds;
        let mut nearby: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(i, c)| {
                c.start <= start + window && c.end >= start - window && !selected.contains(i)
            })
            .map(|(i, _)| i)
            .collect();
        nearby.sort_by(|&a, &b| {
            let da = (candidates[a].start - start).abs();
            let db = (candidates[b].start - start).abs();
            da.total_cmp(&db)
        });

        let remaining = max_images - selected.len();
        selected.extend(nearby.into_iter().take(remaining));
        selected.sort_by(|&a, &b| candidates[a].start.total_cmp(&candidates[b].start));
    }

    selected
        .into_iter()
        .take(max_images)
        .map(|i| candidates[i].clone())
        .collect()
}
