//! Annotated frame writer: draws hand skeletons and saves frames as PNG.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use help_signal_core::domain::HAND_CONNECTIONS;
use help_signal_core::{Frame, FrameOverlay, FrameSink, GesturePhase, HandOverlay, Landmark};
use image::{Rgb, RgbImage};
use tracing::debug;

const IDLE_COLOR: Rgb<u8> = Rgb([0, 200, 0]);
const ARMED_COLOR: Rgb<u8> = Rgb([255, 170, 0]);
const POINT_COLOR: Rgb<u8> = Rgb([220, 0, 0]);
const POINT_RADIUS: i64 = 3;

/// Writes every frame with an image to `frame_{index:06}.png` in a directory.
pub struct AnnotatedFrameWriter {
    dir: PathBuf,
    written: usize,
}

impl AnnotatedFrameWriter {
    /// Creates the writer, creating `dir` if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            written: 0,
        })
    }

    /// Number of frames written so far.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Path a frame is written to.
    #[must_use]
    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{index:06}.png"))
    }
}

impl FrameSink for AnnotatedFrameWriter {
    fn present(&mut self, frame: &Frame, overlay: &FrameOverlay) -> Result<()> {
        let Some(image) = &frame.image else {
            debug!("Frame {} has no image, not rendering", frame.index);
            return Ok(());
        };

        let mut canvas = image.clone();
        for hand in &overlay.hands {
            draw_hand(&mut canvas, hand);
        }

        let path = self.frame_path(frame.index);
        canvas
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        self.written += 1;
        Ok(())
    }
}

/// Draws one hand's connections and landmarks onto `canvas`.
pub fn draw_hand(canvas: &mut RgbImage, hand: &HandOverlay) {
    let color = match hand.phase {
        GesturePhase::Idle => IDLE_COLOR,
        GesturePhase::OpenHandDetected => ARMED_COLOR,
    };
    let (w, h) = canvas.dimensions();

    for (from, to) in HAND_CONNECTIONS {
        // Incomplete sets draw whatever connections they have.
        if let (Ok(a), Ok(b)) = (hand.landmarks.get(from), hand.landmarks.get(to)) {
            draw_line(canvas, to_pixel(a, w, h), to_pixel(b, w, h), color);
        }
    }
    for point in hand.landmarks.iter() {
        draw_dot(canvas, to_pixel(*point, w, h), POINT_COLOR);
    }
}

/// Maps a normalized landmark to pixel coordinates. May fall outside the image.
#[allow(clippy::cast_possible_truncation)]
fn to_pixel(point: Landmark, width: u32, height: u32) -> (i64, i64) {
    let x = (f64::from(point.x) * f64::from(width)).round() as i64;
    let y = (f64::from(point.y) * f64::from(height)).round() as i64;
    (x, y)
}

fn put(canvas: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) {
        if x < canvas.width() && y < canvas.height() {
            canvas.put_pixel(x, y, color);
        }
    }
}

/// Bresenham line, clipped to the canvas.
fn draw_line(canvas: &mut RgbImage, (x0, y0): (i64, i64), (x1, y1): (i64, i64), color: Rgb<u8>) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let (mut x, mut y) = (x0, y0);
    let mut err = dx + dy;

    loop {
        put(canvas, x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn draw_dot(canvas: &mut RgbImage, (cx, cy): (i64, i64), color: Rgb<u8>) {
    for dy in -POINT_RADIUS..=POINT_RADIUS {
        for dx in -POINT_RADIUS..=POINT_RADIUS {
            if dx * dx + dy * dy <= POINT_RADIUS * POINT_RADIUS {
                put(canvas, cx + dx, cy + dy, color);
            }
        }
    }
}
