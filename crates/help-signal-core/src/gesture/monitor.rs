//! Gesture tracking for every hand in view.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::domain::{GestureEvent, GesturePhase, HandPose, TrackId};

use super::GestureTracker;

/// Holds one [`GestureTracker`] per track.
///
/// Tracks are created on first sight and never evicted; a hand that leaves
/// the frame keeps its progress until it is seen again, the same way a lone
/// hand keeps its state across frames with no detections.
#[derive(Debug, Clone, Default)]
pub struct GestureMonitor {
    trackers: BTreeMap<TrackId, GestureTracker>,
}

impl GestureMonitor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the pose of one track observed at `now`.
    pub fn observe(&mut self, track: TrackId, pose: HandPose, now: Duration) -> GestureEvent {
        self.trackers.entry(track).or_default().update(pose, now)
    }

    /// Phase of a track; unseen tracks are idle.
    #[must_use]
    pub fn phase(&self, track: TrackId) -> GesturePhase {
        self.trackers
            .get(&track)
            .map_or(GesturePhase::Idle, GestureTracker::phase)
    }

    /// Tracker of a track, if it has been seen.
    #[must_use]
    pub fn tracker(&self, track: TrackId) -> Option<&GestureTracker> {
        self.trackers.get(&track)
    }

    /// Number of tracks currently armed.
    #[must_use]
    pub fn armed_count(&self) -> usize {
        self.trackers
            .values()
            .filter(|t| t.phase() == GesturePhase::OpenHandDetected)
            .count()
    }

    /// Number of tracks seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }
}
