//! Synchronous, fire-and-forget alert dispatch.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::{DispatchError, ALERT_BODY};
use crate::ports::{AlertGateway, AlertRequest, AlertSink};

/// Sends the emergency message through a gateway.
///
/// Delivery is attempted exactly once. Used directly as an [`AlertSink`] the
/// dispatch blocks the caller for the gateway round trip; wrap it in an
/// [`AlertWorker`](super::AlertWorker) to keep it off the capture loop.
#[derive(Clone)]
pub struct AlertDispatcher {
    gateway: Arc<dyn AlertGateway>,
}

impl AlertDispatcher {
    #[must_use]
    pub fn new(gateway: Arc<dyn AlertGateway>) -> Self {
        Self { gateway }
    }

    /// Sends the emergency message.
    ///
    /// # Errors
    ///
    /// Returns the gateway's error if delivery fails.
    pub fn send_alert(&self) -> Result<(), DispatchError> {
        let receipt = self.gateway.send(ALERT_BODY)?;
        info!(
            "Emergency SMS sent successfully (id {}, status {})",
            receipt.id, receipt.status
        );
        Ok(())
    }

    /// Sends the emergency message, logging and discarding any failure.
    pub fn notify(&self) {
        if let Err(e) = self.send_alert() {
            error!("Error sending emergency SMS: {e}");
        }
    }
}

impl AlertSink for AlertDispatcher {
    fn raise(&self, request: &AlertRequest) {
        warn!(
            "Help signal from {} ({} hand) at frame {}, held {:.1}s",
            request.track,
            request.handedness,
            request.frame,
            request.held.as_secs_f32()
        );
        self.notify();
    }
}

impl std::fmt::Debug for AlertDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertDispatcher").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::ports::DeliveryReceipt;

    struct RecordingGateway {
        bodies: Mutex<Vec<String>>,
        fail: bool,
    }

    impl AlertGateway for RecordingGateway {
        fn send(&self, body: &str) -> Result<DeliveryReceipt, DispatchError> {
            self.bodies.lock().unwrap().push(body.to_string());
            if self.fail {
                Err(DispatchError::Transport("connection refused".into()))
            } else {
                Ok(DeliveryReceipt {
                    id: "SM1".into(),
                    status: "queued".into(),
                })
            }
        }
    }

    fn gateway(fail: bool) -> Arc<RecordingGateway> {
        Arc::new(RecordingGateway {
            bodies: Mutex::new(Vec::new()),
            fail,
        })
    }

    #[test]
    fn test_send_alert_uses_fixed_body() {
        let gw = gateway(false);
        let dispatcher = AlertDispatcher::new(gw.clone());
        dispatcher.send_alert().unwrap();
        assert_eq!(gw.bodies.lock().unwrap().as_slice(), [ALERT_BODY]);
    }

    #[test]
    fn test_send_alert_propagates_gateway_error() {
        let dispatcher = AlertDispatcher::new(gateway(true));
        assert_eq!(
            dispatcher.send_alert(),
            Err(DispatchError::Transport("connection refused".into()))
        );
    }

    #[test]
    fn test_notify_swallows_failure_and_does_not_retry() {
        let gw = gateway(true);
        let dispatcher = AlertDispatcher::new(gw.clone());
        dispatcher.notify();
        assert_eq!(gw.bodies.lock().unwrap().len(), 1);
    }
}
