//! Landmark log adapter: replays recorded hand detections.
//!
//! A landmark log is a JSON Lines file with one record per frame:
//!
//! ```json
//! {"frame": 3, "timestamp_ms": 100, "hands": [{"handedness": "Right", "landmarks": [[0.5, 0.4], ...]}]}
//! ```
//!
//! Points are either `{"x", "y", "z"}` objects or `[x, y]` / `[x, y, z]`
//! arrays. Frames absent from the log have no hands.

use std::collections::{BTreeMap, VecDeque};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use help_signal_core::{Frame, FrameSource, HandDetection, HandDetector, Handedness, Landmark};
use serde::Deserialize;
use tracing::debug;

use crate::fs::frame_timestamp;

#[derive(Debug, Deserialize)]
struct RawRecord {
    frame: u64,
    #[serde(default)]
    timestamp_ms: Option<u64>,
    #[serde(default)]
    hands: Vec<RawHand>,
}

#[derive(Debug, Deserialize)]
struct RawHand {
    handedness: String,
    landmarks: Vec<RawPoint>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPoint {
    Object(Landmark),
    Array(Vec<f32>),
}

impl RawPoint {
    fn into_landmark(self) -> Result<Landmark> {
        match self {
            Self::Object(landmark) => Ok(landmark),
            Self::Array(values) => match values[..] {
                [x, y] => Ok(Landmark::new(x, y, 0.0)),
                [x, y, z] => Ok(Landmark::new(x, y, z)),
                _ => anyhow::bail!("point array must have 2 or 3 values, got {}", values.len()),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Record {
    pub(crate) timestamp: Option<Duration>,
    pub(crate) hands: Vec<HandDetection>,
}

/// Recorded hand detections, indexed by frame.
#[derive(Debug, Clone, Default)]
pub struct LandmarkLog {
    records: BTreeMap<u64, Record>,
}

impl LandmarkLog {
    /// Loads a log from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a line is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open landmark log {}", path.display()))?;
        let log = Self::from_reader(BufReader::new(file))
            .with_context(|| format!("Invalid landmark log {}", path.display()))?;
        debug!("Loaded {} frames from {}", log.len(), path.display());
        Ok(log)
    }

    /// Parses a log from JSON Lines.
    ///
    /// # Errors
    ///
    /// Returns an error naming the line if a record is malformed or repeats a frame.
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut records = BTreeMap::new();

        for (i, line) in reader.lines().enumerate() {
            let line_no = i + 1;
            let line = line.with_context(|| format!("Failed to read line {line_no}"))?;
            if line.trim().is_empty() {
                continue;
            }
            let (frame, record) =
                parse_record(&line).with_context(|| format!("Line {line_no}"))?;
            if records.insert(frame, record).is_some() {
                anyhow::bail!("Line {line_no}: frame {frame} appears more than once");
            }
        }

        Ok(Self { records })
    }

    /// Number of recorded frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recorded frame numbers in ascending order.
    pub fn frames(&self) -> impl Iterator<Item = u64> + '_ {
        self.records.keys().copied()
    }

    /// Hands recorded for `frame`; empty if the frame is absent.
    #[must_use]
    pub fn hands(&self, frame: u64) -> &[HandDetection] {
        self.records
            .get(&frame)
            .map_or(&[][..], |record| record.hands.as_slice())
    }

    /// Frames for replaying the log without images.
    ///
    /// Each record becomes one frame, stamped with its `timestamp_ms` or, if
    /// absent, with `frame / frame_rate`.
    ///
    /// # Errors
    ///
    /// Returns an error if `frame_rate` is not positive or a frame cannot be
    /// stamped at that rate.
    pub fn timeline(&self, frame_rate: f64) -> Result<LogTimeline> {
        if !(frame_rate.is_finite() && frame_rate > 0.0) {
            anyhow::bail!("Frame rate must be positive, got {frame_rate}");
        }
        let frames = self
            .records
            .iter()
            .map(|(&index, record)| {
                let timestamp = match record.timestamp {
                    Some(timestamp) => timestamp,
                    None => frame_timestamp(index, frame_rate)?,
                };
                Ok((index, timestamp))
            })
            .collect::<Result<_>>()?;
        Ok(LogTimeline { frames })
    }
}

impl HandDetector for LandmarkLog {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<HandDetection>> {
        Ok(self.hands(frame.index).to_vec())
    }
}

/// Image-less frame source derived from a [`LandmarkLog`].
#[derive(Debug, Clone)]
pub struct LogTimeline {
    frames: VecDeque<(u64, Duration)>,
}

impl FrameSource for LogTimeline {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        Ok(self
            .frames
            .pop_front()
            .map(|(index, timestamp)| Frame::bare(index, timestamp)))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.frames.len())
    }
}

pub(crate) fn parse_record(line: &str) -> Result<(u64, Record)> {
    let raw: RawRecord = serde_json::from_str(line)?;
    let hands = raw
        .hands
        .into_iter()
        .enumerate()
        .map(|(i, hand)| {
            let handedness: Handedness = hand
                .handedness
                .parse()
                .map_err(|e: String| anyhow::anyhow!("hand {i}: {e}"))?;
            let points = hand
                .landmarks
                .into_iter()
                .map(RawPoint::into_landmark)
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("hand {i}"))?;
            Ok(HandDetection::new(handedness, points.into()))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((
        raw.frame,
        Record {
            timestamp: raw.timestamp_ms.map(Duration::from_millis),
            hands,
        },
    ))
}
