//! Frame source port for pulling captured frames.

use crate::domain::Frame;

/// Port for reading frames from a camera or a recording.
pub trait FrameSource {
    /// Reads the next frame.
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if a single frame could not be read. The session
    /// treats this as transient and asks for the next frame.
    fn next_frame(&mut self) -> anyhow::Result<Option<Frame>>;

    /// Returns the total number of frames, if known.
    fn count_hint(&self) -> Option<usize> {
        None
    }
}
