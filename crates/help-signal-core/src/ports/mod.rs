//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the domain core and external adapters.

mod alert;
mod frame_sink;
mod frame_source;
mod hand_detector;
mod progress;
mod report_output;

pub use alert::{AlertGateway, AlertRequest, AlertSink, DeliveryReceipt};
pub use frame_sink::{FrameOverlay, FrameSink, HandOverlay};
pub use frame_source::FrameSource;
pub use hand_detector::HandDetector;
pub use progress::{ProgressEvent, ProgressSink};
pub use report_output::ReportOutput;
