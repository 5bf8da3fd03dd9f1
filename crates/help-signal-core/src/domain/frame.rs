//! Frame and detection types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Handedness, LandmarkSet};

/// One captured frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Sequence number within the session (0-based).
    pub index: u64,
    /// Capture time relative to the start of the session.
    pub timestamp: Duration,
    /// Decoded RGB pixels, if the source carries images.
    pub image: Option<image::RgbImage>,
}

impl Frame {
    /// Creates a frame without pixel data.
    #[must_use]
    pub const fn bare(index: u64, timestamp: Duration) -> Self {
        Self {
            index,
            timestamp,
            image: None,
        }
    }

    /// Creates a frame carrying an image.
    #[must_use]
    pub const fn with_image(index: u64, timestamp: Duration, image: image::RgbImage) -> Self {
        Self {
            index,
            timestamp,
            image: Some(image),
        }
    }
}

/// A hand found in a frame by the landmark detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandDetection {
    /// Left or right hand.
    pub handedness: Handedness,
    /// The hand skeleton.
    pub landmarks: LandmarkSet,
}

impl HandDetection {
    #[must_use]
    pub const fn new(handedness: Handedness, landmarks: LandmarkSet) -> Self {
        Self {
            handedness,
            landmarks,
        }
    }
}
