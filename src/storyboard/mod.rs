//! Storyboard thumbnails: timed preview frames and matching them to sections.
//!
//! The video platform publishes storyboards as grids of small frames. They are
//! sliced into one file per frame, each tagged with the time window it covers,
//! and the renderer picks the frames that belong to each summary section.

mod matcher;
mod youtube;

pub use matcher::{match_images, MatchConfig, MAX_IMAGES};
pub use youtube::{Fragment, StoryboardFetcher, StoryboardFormat};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One thumbnail file and the time window it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageCandidate {
    /// Path to the image file.
    pub path: PathBuf,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
}

impl ImageCandidate {
    pub fn new(path: impl Into<PathBuf>, start: f64, end: f64) -> Self {
        Self {
            path: path.into(),
            start,
            end,
        }
    }
}

/// Read an image manifest (a JSON array of candidates).
pub fn load_manifest(path: &Path) -> Result<Vec<ImageCandidate>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write an image manifest next to the sliced images.
pub fn save_manifest(path: &Path, images: &[ImageCandidate]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(images)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_round_trip() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("images").join("manifest.json");
        let images = vec![
            ImageCandidate::new("images/a.jpg", 0.0, 5.0),
            ImageCandidate::new("images/b.jpg", 5.0, 10.0),
        ];

        save_manifest(&path, &images)?;
        assert_eq!(load_manifest(&path)?, images);
        Ok(())
    }

    #[test]
    fn test_manifest_format() {
        let json = r#"[{"path": "x.jpg", "start": 1.5, "end": 3}]"#;
        let images: Vec<ImageCandidate> = serde_json::from_str(json).unwrap();
        assert_eq!(images[0], ImageCandidate::new("x.jpg", 1.5, 3.0));
    }
}
