//! Two-phase help gesture tracker for a single hand.

use std::time::Duration;

use tracing::{debug, info};

use crate::domain::{GestureEvent, GesturePhase, HandPose};

/// How long the fist must follow the open hand before the alert fires.
pub const HOLD_DURATION: Duration = Duration::from_secs(5);

/// Missed frames tolerated while armed before the gesture is abandoned.
pub const MAX_TRANSITION_FRAMES: u32 = 10;

/// Internal tracker state. The hold timer and miss counter only exist while
/// armed, so returning to idle discards both at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Idle,
    OpenHand {
        since: Duration,
        missed_frames: u32,
    },
}

/// Tracks the open-hand → held-fist sequence for one hand.
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    state: State,
}

impl GestureTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> GesturePhase {
        match self.state {
            State::Idle => GesturePhase::Idle,
            State::OpenHand { .. } => GesturePhase::OpenHandDetected,
        }
    }

    /// Time at which the open hand was last seen, while armed.
    #[must_use]
    pub const fn armed_at(&self) -> Option<Duration> {
        match self.state {
            State::Idle => None,
            State::OpenHand { since, .. } => Some(since),
        }
    }

    /// Consecutive frames without an open hand or fist while armed.
    #[must_use]
    pub const fn missed_frames(&self) -> u32 {
        match self.state {
            State::Idle => 0,
            State::OpenHand { missed_frames, .. } => missed_frames,
        }
    }

    /// Feeds one frame's pose, observed at `now`.
    ///
    /// Every open-hand frame re-arms the timer, so the hold is measured from
    /// the last frame in which the open hand was visible.
    pub fn update(&mut self, pose: HandPose, now: Duration) -> GestureEvent {
        if pose.is_open_hand() {
            self.state = State::OpenHand {
                since: now,
                missed_frames: 0,
            };
            return GestureEvent::Armed;
        }

        let State::OpenHand {
            since,
            missed_frames,
        } = self.state
        else {
            return GestureEvent::Ignored;
        };

        if pose.fist {
            let held = now.saturating_sub(since);
            if held >= HOLD_DURATION {
                info!("Help sign detected and held for {:.1}s", held.as_secs_f32());
                self.reset();
                return GestureEvent::Triggered { held };
            }
            debug!("Help sign shown but not held long enough ({held:?})");
            return GestureEvent::Holding { elapsed: held };
        }

        let missed_frames = missed_frames + 1;
        if missed_frames > MAX_TRANSITION_FRAMES {
            debug!("Help sign abandoned after {missed_frames} frames");
            self.reset();
            return GestureEvent::TimedOut;
        }
        self.state = State::OpenHand {
            since,
            missed_frames,
        };
        GestureEvent::Missed { missed_frames }
    }

    /// Returns to idle, discarding the timer and miss counter.
    pub fn reset(&mut self) {
        self.state = State::Idle;
    }
}
