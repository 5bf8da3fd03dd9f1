//! Help Signal CLI - Emergency hand-signal watcher.

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Credentials may live in a .env file next to the project.
    if let Ok(path) = dotenv::dotenv() {
        debug!("Loaded environment from {}", path.display());
    }

    let config = AppConfig::load();

    let exit_code = match cli.command {
        Commands::Watch(args) => {
            let args = commands::watch::WatchArgs::with_config(args, &config);
            match commands::watch::run(&args) {
                Ok(summary) => {
                    debug!(
                        "{} frames, {} hands, {} alerts",
                        summary.frames, summary.hands, summary.alerts
                    );
                    ExitCode::Success
                }
                Err(e) => {
                    eprintln!("error: {e:#}");
                    ExitCode::Error
                }
            }
        }
        Commands::Classify(ref args) => match commands::classify::run(args) {
            Ok(count) => {
                debug!("Classified {count} hands");
                ExitCode::Success
            }
            Err(e) => {
                eprintln!("error: {e:#}");
                ExitCode::Error
            }
        },
    };

    exit_code.into()
}
