//! Help gesture state machine.

mod monitor;
mod tracker;

pub use monitor::GestureMonitor;
pub use tracker::{GestureTracker, HOLD_DURATION, MAX_TRANSITION_FRAMES};
