//! Output formatting for CLI.

mod json;
mod progress;

pub use json::{JsonArrayOutput, JsonOutput};
pub use progress::ProgressBar;
