//! Core domain types for hand-signal recognition.

mod frame;
mod gesture;
mod landmark;
mod report;

pub use frame::{Frame, HandDetection};
pub use gesture::{GestureEvent, GesturePhase, HandPose, TrackId};
pub use landmark::{
    HandLandmark, Handedness, Landmark, LandmarkSet, HAND_CONNECTIONS, LANDMARK_COUNT,
};
pub use report::{FrameReport, HandReport};
