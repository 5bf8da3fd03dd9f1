//! Test support utilities for help-signal.
//!
//! Provides mocks, synthetic hand builders, and utilities for testing
//! the gesture recognition session.
//!
//! # Example
//!
//! ```
//! use help_signal_core::domain::Handedness;
//! use help_signal_test_support::{HandBuilder, MockHandDetector};
//!
//! // Script a detector: open hand, then a fist
//! let detector = MockHandDetector::new(vec![
//!     vec![HandBuilder::open_tucked(Handedness::Right).build()],
//!     vec![HandBuilder::fist(Handedness::Right).build()],
//! ]);
//! ```

mod builders;
mod mocks;

pub use builders::{FrameBuilder, HandBuilder};
pub use mocks::{
    MockAlertGateway, MockAlertSink, MockFrameSink, MockFrameSource, MockHandDetector,
    MockProgressSink, MockReportOutput,
};
