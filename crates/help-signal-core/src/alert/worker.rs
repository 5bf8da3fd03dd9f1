//! Background alert dispatch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use crossbeam_channel::{bounded, Sender, TrySendError};
use tracing::{debug, warn};

use super::AlertDispatcher;
use crate::ports::{AlertRequest, AlertSink};

/// At most one alert waits while another is being delivered.
const ALERT_QUEUE_CAPACITY: usize = 1;

/// Outcome of handing an alert to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handoff {
    /// The alert will be delivered.
    Queued,
    /// An alert was already waiting; this one was discarded.
    Dropped,
    /// The worker has shut down.
    Closed,
}

/// Runs an [`AlertDispatcher`] on its own thread.
///
/// Handing off never blocks. While one alert is being delivered a second can
/// wait in the queue; any further alerts are dropped until the queue drains.
pub struct AlertWorker {
    sender: Option<Sender<AlertRequest>>,
    handle: Option<JoinHandle<()>>,
    dropped: Arc<AtomicU64>,
    delivered: Arc<AtomicU64>,
}

impl AlertWorker {
    /// Starts the dispatch thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(dispatcher: AlertDispatcher) -> Result<Self> {
        let (sender, receiver) = bounded::<AlertRequest>(ALERT_QUEUE_CAPACITY);
        let delivered = Arc::new(AtomicU64::new(0));
        let delivered_in_thread = Arc::clone(&delivered);

        let handle = thread::Builder::new()
            .name("alert-dispatch".into())
            .spawn(move || {
                for request in &receiver {
                    dispatcher.raise(&request);
                    delivered_in_thread.fetch_add(1, Ordering::Relaxed);
                }
                debug!("Alert worker exiting");
            })
            .context("Failed to spawn alert dispatch thread")?;

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
            dropped: Arc::new(AtomicU64::new(0)),
            delivered,
        })
    }

    /// Hands an alert to the worker without blocking.
    pub fn try_raise(&self, request: &AlertRequest) -> Handoff {
        let Some(sender) = self.sender.as_ref() else {
            return Handoff::Closed;
        };
        match sender.try_send(*request) {
            Ok(()) => Handoff::Queued,
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(
                    "Alert dispatch busy; dropping alert from {} at frame {}",
                    request.track, request.frame
                );
                Handoff::Dropped
            }
            Err(TrySendError::Disconnected(_)) => Handoff::Closed,
        }
    }

    /// Alerts discarded because the queue was full.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Stops accepting alerts and waits for queued ones to be dispatched.
    ///
    /// Returns the number of alerts the worker dispatched, successful or not.
    pub fn shutdown(mut self) -> u64 {
        self.stop();
        self.delivered.load(Ordering::Relaxed)
    }

    fn stop(&mut self) {
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Alert dispatch thread panicked");
            }
        }
    }
}

impl AlertSink for AlertWorker {
    fn raise(&self, request: &AlertRequest) {
        self.try_raise(request);
    }
}

impl Drop for AlertWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
