//! Alert delivery.
//!
//! [`AlertDispatcher`] sends the fixed emergency message through an
//! [`AlertGateway`](crate::ports::AlertGateway) and swallows failures.
//! [`AlertWorker`] moves dispatch onto a background thread so a slow gateway
//! never stalls the capture loop.

mod dispatcher;
mod worker;

use thiserror::Error;

pub use dispatcher::AlertDispatcher;
pub use worker::{AlertWorker, Handoff};

/// Body of every emergency message.
pub const ALERT_BODY: &str = "🚨 Emergency gesture detected! Please check immediately.";

/// Errors raised while delivering an alert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The gateway could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// The gateway refused the message.
    #[error("gateway rejected message (HTTP {status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Gateway-specific error code, if provided.
        code: Option<i64>,
        /// Human-readable reason.
        message: String,
    },

    /// The gateway answered with something unparseable.
    #[error("invalid gateway response: {0}")]
    InvalidResponse(String),
}
