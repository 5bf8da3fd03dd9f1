//! Hand detector port for landmark inference.

use crate::domain::{Frame, HandDetection};

/// Port for the hand-landmark model.
///
/// Implementations return every hand found in the frame, in a stable order,
/// each with a complete 21-point landmark set.
pub trait HandDetector {
    /// Detects hands in a frame.
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails.
    fn detect(&mut self, frame: &Frame) -> anyhow::Result<Vec<HandDetection>>;
}
