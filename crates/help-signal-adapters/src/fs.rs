//! Filesystem adapter for loading captured frames.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use help_signal_core::{Frame, FrameSource};
use tracing::{debug, warn};

/// Supported image extensions.
const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff", "tif", "webp"];

/// Frame rate used to stamp frames when none is configured.
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Filesystem frame source adapter.
///
/// Reads every supported image in a directory in file-name order, stamping
/// frame `n` at `n / frame_rate` seconds.
pub struct FsFrameSource {
    files: VecDeque<PathBuf>,
    total: usize,
    next_index: u64,
    frame_rate: f64,
    mirror: bool,
}

impl FsFrameSource {
    /// Scans `dir` for frames.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` cannot be read or `frame_rate` is not positive.
    pub fn open(dir: &Path, frame_rate: f64) -> Result<Self> {
        if !(frame_rate.is_finite() && frame_rate > 0.0) {
            anyhow::bail!("Frame rate must be positive, got {frame_rate}");
        }
        let files = collect_files(dir)?;
        debug!("Found {} frames in {}", files.len(), dir.display());

        Ok(Self {
            total: files.len(),
            files: files.into(),
            next_index: 0,
            frame_rate,
            mirror: true,
        })
    }

    /// Sets whether frames are flipped horizontally, as a selfie camera shows them.
    #[must_use]
    pub const fn mirrored(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    fn load(&self, path: &Path, index: u64) -> Result<Frame> {
        let mut image = image::open(path)
            .with_context(|| format!("Failed to open frame: {}", path.display()))?
            .into_rgb8();
        if self.mirror {
            image::imageops::flip_horizontal_in_place(&mut image);
        }
        let timestamp = frame_timestamp(index, self.frame_rate)?;
        Ok(Frame::with_image(index, timestamp, image))
    }
}

impl FrameSource for FsFrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let Some(path) = self.files.pop_front() else {
            return Ok(None);
        };
        // A file that fails to decode still occupies its slot in the timeline.
        let index = self.next_index;
        self.next_index += 1;
        self.load(&path, index).map(Some)
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.total)
    }
}

/// Timestamp of frame `index` at a fixed frame rate.
///
/// # Errors
///
/// Returns an error if the timestamp does not fit in a [`Duration`], which
/// happens for absurdly low frame rates.
pub fn frame_timestamp(index: u64, frame_rate: f64) -> Result<Duration> {
    #[allow(clippy::cast_precision_loss)]
    let secs = index as f64 / frame_rate;
    Duration::try_from_secs_f64(secs)
        .with_context(|| format!("Frame {index} has no valid timestamp at {frame_rate} fps"))
}

fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read frame directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                warn!("Failed to read entry in {}: {e}", dir.display());
                continue;
            }
        };
        if path.is_file() && is_supported_frame(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Checks if a path has a supported image extension.
fn is_supported_frame(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|e| FRAME_EXTENSIONS.contains(&e.as_str()))
}
