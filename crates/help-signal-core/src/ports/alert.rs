//! Alerting ports: the messaging gateway and the session's alert hand-off.

use std::time::Duration;

use serde::Serialize;

use crate::alert::DispatchError;
use crate::domain::{Handedness, TrackId};

/// Acknowledgement returned by a messaging gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReceipt {
    /// Gateway-assigned message identifier.
    pub id: String,
    /// Delivery status as reported by the gateway.
    pub status: String,
}

/// Port for the external messaging service.
///
/// The gateway owns its credentials and the origin and destination
/// addresses; callers only supply the body.
pub trait AlertGateway: Send + Sync {
    /// Sends one message.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway rejects the message or cannot be reached.
    fn send(&self, body: &str) -> Result<DeliveryReceipt, DispatchError>;
}

/// Context of a completed help gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertRequest {
    /// Frame in which the fist hold completed.
    pub frame: u64,
    /// Hand that signalled.
    pub track: TrackId,
    /// Left or right hand.
    pub handedness: Handedness,
    /// How long the fist followed the open hand.
    pub held: Duration,
}

/// Port through which the session raises alerts.
///
/// Raising never fails from the caller's point of view: delivery problems are
/// the sink's to log.
pub trait AlertSink {
    /// Raises one alert.
    fn raise(&self, request: &AlertRequest);
}
