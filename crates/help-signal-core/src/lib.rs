//! Help Signal Core - Domain logic for emergency hand-signal detection
//!
//! This crate contains the hand landmark types, the geometry classifier, the
//! two-phase gesture state machine, alert dispatch and the port traits that
//! adapters implement to feed frames and landmarks into a [`Session`].

pub mod alert;
pub mod classifier;
pub mod domain;
pub mod gesture;
pub mod ports;
pub mod session;

pub use alert::{AlertDispatcher, AlertWorker, DispatchError, Handoff, ALERT_BODY};
pub use classifier::{classify, fingers_outstretched, is_fist, thumb_tucked, ClassifierError};
pub use domain::{
    Frame, FrameReport, GestureEvent, GesturePhase, HandDetection, HandLandmark, HandPose,
    HandReport, Handedness, Landmark, LandmarkSet, TrackId,
};
pub use gesture::{GestureMonitor, GestureTracker, HOLD_DURATION, MAX_TRANSITION_FRAMES};
pub use ports::{
    AlertGateway, AlertRequest, AlertSink, DeliveryReceipt, FrameOverlay, FrameSink, FrameSource,
    HandDetector, HandOverlay, ProgressEvent, ProgressSink, ReportOutput,
};
pub use session::{Session, SessionSummary};
