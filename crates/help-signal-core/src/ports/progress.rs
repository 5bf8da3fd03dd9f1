//! Progress reporting port for UI integration.

use crate::domain::TrackId;

/// Events emitted while a session runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A frame was read.
    Frame {
        /// Frame sequence number.
        index: u64,
        /// Total frames in the source, if known.
        total: Option<usize>,
    },
    /// A frame could not be read.
    Skipped {
        /// Reason for skipping.
        reason: String,
    },
    /// A hand completed the help gesture.
    Alerted {
        /// Frame in which the gesture completed.
        frame: u64,
        /// Hand that signalled.
        track: TrackId,
    },
    /// The source is exhausted.
    Finished {
        /// Frames processed.
        frames: u64,
        /// Frames skipped.
        skipped: u64,
        /// Alerts raised.
        alerts: u64,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}
