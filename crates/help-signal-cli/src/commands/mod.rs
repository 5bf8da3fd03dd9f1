//! CLI command definitions and handlers.

pub mod classify;
pub mod watch;

use clap::{Parser, Subcommand};

/// Help Signal - Emergency hand-signal watcher
#[derive(Parser)]
#[command(name = "help-signal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Watch a feed for the help signal and send an SMS alert
    Watch(watch::WatchArgs),
    /// Print hand shape predicates for every recorded hand
    Classify(classify::ClassifyArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Completed normally.
    Success = 0,
    /// Failed to run.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}
