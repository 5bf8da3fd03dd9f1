//! Help Signal Adapters - External adapters for help-signal.
//!
//! This crate provides adapters for:
//! - Filesystem frame source
//! - Landmark log replay
//! - Live landmark streams (stdin or a producer process)
//! - SMS gateways (Twilio and dry run)
//! - Annotated frame output

pub mod fs;
pub mod landmarks;
pub mod render;
pub mod sms;
pub mod stream;

pub use fs::{FsFrameSource, DEFAULT_FRAME_RATE};
pub use landmarks::{LandmarkLog, LogTimeline};
pub use render::AnnotatedFrameWriter;
pub use sms::{LogGateway, TwilioConfig, TwilioGateway, DEFAULT_API_BASE};
pub use stream::{LandmarkStream, StreamDetector};
