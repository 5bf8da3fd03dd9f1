//! Gesture recognition types.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identifies a tracked hand across frames.
///
/// Detectors report hands in a stable order, so the position of a detection
/// within its frame serves as the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub usize);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hand#{}", self.0)
    }
}

/// Stage of the two-step help gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    /// Waiting for an open hand with the thumb tucked.
    #[default]
    Idle,
    /// Open hand seen; waiting for the fist to be held.
    OpenHandDetected,
}

/// Classifier predicates for one hand in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HandPose {
    /// All four fingertips above their preceding joint.
    pub outstretched: bool,
    /// Thumb tip across the index knuckle.
    pub thumb_tucked: bool,
    /// Thumb tucked and all four fingers curled.
    pub fist: bool,
}

impl HandPose {
    /// First half of the help gesture: open palm, thumb folded in.
    #[must_use]
    pub const fn is_open_hand(&self) -> bool {
        self.outstretched && self.thumb_tucked
    }
}

/// Outcome of feeding one pose into a gesture tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GestureEvent {
    /// Idle and nothing relevant observed.
    Ignored,
    /// Open hand observed; the hold timer restarts.
    Armed,
    /// Fist observed but not yet held long enough.
    Holding {
        /// Time since the open hand was last seen.
        #[serde(with = "duration_ms")]
        elapsed: Duration,
    },
    /// Fist held past the threshold; an alert must be raised.
    Triggered {
        /// Time since the open hand was last seen.
        #[serde(with = "duration_ms")]
        held: Duration,
    },
    /// Neither open hand nor fist while armed.
    Missed {
        /// Consecutive missed frames so far.
        missed_frames: u32,
    },
    /// Too many missed frames; the gesture was abandoned.
    TimedOut,
}

impl GestureEvent {
    /// Whether this event requires an alert.
    #[must_use]
    pub const fn is_triggered(&self) -> bool {
        matches!(self, Self::Triggered { .. })
    }
}

/// Serializes durations as integer milliseconds.
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)] // serde `with` signature
    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
