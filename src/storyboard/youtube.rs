//! YouTube storyboard download and slicing.
//!
//! yt-dlp lists storyboards as pseudo-formats (`format_note: "storyboard"`).
//! Each fragment is one grid image covering `duration` seconds, read row by
//! row, with every cell covering an equal share of that time.

use super::ImageCandidate;
use crate::error::{Result, YoyakuError};
use crate::subtitle::format_vtt_timestamp;
use image::{DynamicImage, ImageFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// One storyboard grid image.
#[derive(Debug, Clone, Deserialize)]
pub struct Fragment {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub duration: f64,
}

/// A storyboard pseudo-format from yt-dlp metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct StoryboardFormat {
    pub format_id: String,
    #[serde(default)]
    pub format_note: Option<String>,
    pub columns: u32,
    pub rows: u32,
    #[serde(default)]
    pub fragment_base_url: Option<String>,
    #[serde(default)]
    pub fragments: Vec<Fragment>,
}

impl StoryboardFormat {
    /// Find the storyboard format with `format_id` in yt-dlp `--dump-json` output.
    pub fn from_info(info: &serde_json::Value, format_id: &str) -> Option<Self> {
        info["formats"]
            .as_array()?
            .iter()
            .filter(|f| f["format_note"].as_str() == Some("storyboard"))
            .filter(|f| f["format_id"].as_str() == Some(format_id))
            .find_map(|f| serde_json::from_value(f.clone()).ok())
    }

    /// Frames per grid image.
    pub fn cells(&self) -> u32 {
        self.columns * self.rows
    }

    fn fragment_url(&self, fragment: &Fragment) -> Option<String> {
        match (&fragment.url, &self.fragment_base_url, &fragment.path) {
            (Some(url), _, _) => Some(url.clone()),
            (None, Some(base), Some(path)) => Some(format!("{}{}", base, path)),
            _ => None,
        }
    }
}

/// Downloads storyboard grids and slices them into timed frames.
pub struct StoryboardFetcher {
    client: reqwest::Client,
}

impl StoryboardFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Download every fragment of `format`, slice it, and save the frames
    /// under `images_dir`.
    ///
    /// Fragments that fail to download or decode are skipped.
    #[instrument(skip(self, format, images_dir), fields(video_id = %video_id))]
    pub async fn fetch(
        &self,
        format: &StoryboardFormat,
        video_id: &str,
        images_dir: &Path,
    ) -> Result<Vec<ImageCandidate>> {
        std::fs::create_dir_all(images_dir)?;

        if format.cells() == 0 || format.fragments.is_empty() {
            return Err(YoyakuError::Storyboard(format!(
                "Storyboard {} has no frames",
                format.format_id
            )));
        }

        info!(
            "Storyboard {}: {}x{} grid, {} fragments",
            format.format_id,
            format.columns,
            format.rows,
            format.fragments.len()
        );

        let mut images = Vec::new();
        let mut cell_size: Option<(u32, u32)> = None;
        let mut fragment_start = 0.0;

        for (idx, fragment) in format.fragments.iter().enumerate() {
            let start = fragment_start;
            fragment_start += fragment.duration;

            let grid = match self.download_fragment(format, fragment).await {
                Ok(grid) => grid,
                Err(e) => {
                    warn!("Skipping storyboard fragment {}: {}", idx, e);
                    continue;
                }
            };

            // Later fragments may be shorter; keep the first fragment's cell size
            let size = *cell_size.get_or_insert_with(|| {
                (grid.width() / format.columns, grid.height() / format.rows)
            });
            if size.0 == 0 || size.1 == 0 {
                warn!("Storyboard fragment {} is smaller than its grid, skipping", idx);
                continue;
            }

            let layout = GridLayout {
                columns: format.columns,
                rows: format.rows,
                cell_width: size.0,
                cell_height: size.1,
            };
            let sliced = slice_grid(&grid, &layout, start, fragment.duration, video_id, idx, images_dir)?;
            debug!("Fragment {} sliced into {} frames", idx, sliced.len());
            images.extend(sliced);
        }

        info!("Saved {} storyboard frames", images.len());
        Ok(images)
    }

    async fn download_fragment(&self, format: &StoryboardFormat, fragment: &Fragment) -> Result<DynamicImage> {
        let url = format
            .fragment_url(fragment)
            .ok_or_else(|| YoyakuError::Storyboard("Fragment has no URL".to_string()))?;

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        Ok(image::load_from_memory(&bytes)?)
    }
}

impl Default for StoryboardFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Cell geometry of a storyboard grid.
#[derive(Debug, Clone, Copy)]
struct GridLayout {
    columns: u32,
    rows: u32,
    cell_width: u32,
    cell_height: u32,
}

/// Cut a grid image into cells, saving each as JPEG with its time window.
fn slice_grid(
    grid: &DynamicImage,
    layout: &GridLayout,
    start: f64,
    duration: f64,
    video_id: &str,
    fragment_idx: usize,
    images_dir: &Path,
) -> Result<Vec<ImageCandidate>> {
    let cells = layout.columns * layout.rows;
    let time_per_cell = duration / cells as f64;
    let mut images = Vec::with_capacity(cells as usize);

    for row in 0..layout.rows {
        for col in 0..layout.columns {
            let left = col * layout.cell_width;
            let top = row * layout.cell_height;
            if left >= grid.width() || top >= grid.height() {
                continue;
            }

            let cell_index = row * layout.columns + col;
            let cell_start = start + cell_index as f64 * time_per_cell;
            let cell_end = cell_start + time_per_cell;

            let path = frame_path(images_dir, video_id, cell_start, cell_end, fragment_idx);
            grid.crop_imm(left, top, layout.cell_width, layout.cell_height)
                .to_rgb8()
                .save_with_format(&path, ImageFormat::Jpeg)?;

            images.push(ImageCandidate::new(path, cell_start, cell_end));
        }
    }

    Ok(images)
}

/// `<id>_t<HHMMSSmmm>_to_<HHMMSSmmm>_f<n>.jpg`, free of path-hostile characters.
fn frame_path(dir: &Path, video_id: &str, start: f64, end: f64, fragment_idx: usize) -> PathBuf {
    let compact = |t: f64| format_vtt_timestamp(t).replace([':', '.'], "");
    dir.join(format!(
        "{}_t{}_to_{}_f{}.jpg",
        video_id,
        compact(start),
        compact(end),
        fragment_idx
    ))
}
