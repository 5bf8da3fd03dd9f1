//! Per-frame report types.

use serde::{Deserialize, Serialize};

use super::{GestureEvent, GesturePhase, HandPose, Handedness, TrackId};

/// Everything the session decided about one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    /// Frame sequence number.
    pub frame: u64,
    /// Capture time in milliseconds since session start.
    pub timestamp_ms: u64,
    /// One entry per detected hand.
    pub hands: Vec<HandReport>,
}

impl FrameReport {
    /// Returns true if any hand in this frame triggered an alert.
    #[must_use]
    pub fn triggered(&self) -> bool {
        self.hands.iter().any(|h| h.event.is_triggered())
    }
}

/// Classification and gesture progress of one hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandReport {
    /// Track the hand was assigned to.
    pub track: TrackId,
    /// Left or right hand.
    pub handedness: Handedness,
    /// Classifier predicates.
    pub pose: HandPose,
    /// What the gesture tracker did with the pose.
    pub event: GestureEvent,
    /// Tracker phase after the update.
    pub phase: GesturePhase,
}
