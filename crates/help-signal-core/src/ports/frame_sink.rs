//! Frame sink port for rendering feedback.

use crate::domain::{Frame, GesturePhase, Handedness, LandmarkSet};

/// What to draw on top of a frame.
#[derive(Debug, Clone, Default)]
pub struct FrameOverlay {
    /// One entry per detected hand.
    pub hands: Vec<HandOverlay>,
}

/// Overlay data for one hand.
#[derive(Debug, Clone)]
pub struct HandOverlay {
    /// Left or right hand.
    pub handedness: Handedness,
    /// Landmarks to draw.
    pub landmarks: LandmarkSet,
    /// Gesture phase after this frame.
    pub phase: GesturePhase,
}

/// Port for displaying annotated frames.
pub trait FrameSink {
    /// Presents a frame together with its overlay.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or writing fails.
    fn present(&mut self, frame: &Frame, overlay: &FrameOverlay) -> anyhow::Result<()>;
}
