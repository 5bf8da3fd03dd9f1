//! Watch command - replay a feed and raise alerts on the help signal.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use help_signal_adapters::{
    AnnotatedFrameWriter, FsFrameSource, LandmarkLog, LandmarkStream, LogGateway, TwilioConfig,
    TwilioGateway, DEFAULT_FRAME_RATE,
};
use help_signal_core::{
    AlertDispatcher, AlertGateway, AlertSink, AlertWorker, FrameSource, HandDetector,
    ReportOutput, Session, SessionSummary,
};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::output::{JsonArrayOutput, JsonOutput, ProgressBar};

/// Output format for frame reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
}

impl OutputFormat {
    fn from_config(s: &str) -> Option<Self> {
        match s {
            "json" => Some(Self::Json),
            "jsonl" => Some(Self::Jsonl),
            _ => None,
        }
    }
}

/// Parse and validate a frame rate.
fn parse_frame_rate(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} is not a positive frame rate"))
    }
}

/// Arguments for the watch command.
#[derive(Args, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct WatchArgs {
    /// Landmark log (JSON Lines) recorded by the hand landmark model; `-` streams stdin
    #[arg(
        long,
        value_name = "FILE",
        required_unless_present = "detector_cmd",
        conflicts_with = "detector_cmd"
    )]
    pub landmarks: Option<PathBuf>,

    /// Start a landmark producer (program and arguments) and watch its output live
    #[arg(long, value_name = "CMD")]
    pub detector_cmd: Option<String>,

    /// Directory of captured frames matching the landmark log
    #[arg(long, value_name = "DIR")]
    pub frames: Option<PathBuf>,

    /// Frames per second used to timestamp frames
    #[arg(long, value_parser = parse_frame_rate)]
    pub frame_rate: Option<f64>,

    /// Do not mirror frames horizontally
    #[arg(long)]
    pub no_mirror: bool,

    /// Write annotated frames to this directory (requires --frames)
    #[arg(long, value_name = "DIR")]
    pub annotate: Option<PathBuf>,

    /// Log alerts instead of sending SMS
    #[arg(long)]
    pub dry_run: bool,

    /// Send alerts on the capture loop instead of a background worker
    #[arg(long)]
    pub inline_alerts: bool,

    /// Messaging API host (default: https://api.twilio.com)
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,
}

impl WatchArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    #[must_use]
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        args.frame_rate = args.frame_rate.or(config.feed.frame_rate);

        // CLI --no-mirror wins; otherwise config may turn mirroring off.
        if !args.no_mirror {
            if let Some(mirror) = config.feed.mirror {
                args.no_mirror = !mirror;
            }
        }

        if !args.dry_run {
            args.dry_run = config.alert.dry_run.unwrap_or(false);
        }
        if !args.inline_alerts {
            args.inline_alerts = config.alert.inline.unwrap_or(false);
        }
        if args.api_base.is_none() {
            args.api_base.clone_from(&config.alert.api_base);
        }

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_deref()
                .and_then(OutputFormat::from_config);
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }
        if args.annotate.is_none() {
            args.annotate.clone_from(&config.output.annotate_dir);
        }

        args
    }

    /// Get frame rate with fallback to the default.
    fn frame_rate(&self) -> f64 {
        self.frame_rate.unwrap_or(DEFAULT_FRAME_RATE)
    }

    /// Whether landmarks arrive live rather than from a recorded log.
    fn is_live(&self) -> bool {
        self.detector_cmd.is_some()
            || self
                .landmarks
                .as_deref()
                .is_some_and(|path| path.as_os_str() == "-")
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }
}

/// Run the watch command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &WatchArgs) -> Result<SessionSummary> {
    if args.annotate.is_some() && args.frames.is_none() {
        anyhow::bail!("--annotate needs --frames: a landmark log alone has no images to draw on");
    }

    let (mut source, mut detector) = open_feed(args)?;

    let dispatcher = AlertDispatcher::new(build_gateway(args)?);
    let worker = if args.inline_alerts {
        debug!("Dispatching alerts inline");
        None
    } else {
        Some(AlertWorker::spawn(dispatcher.clone())?)
    };
    let alerts: &dyn AlertSink = match &worker {
        Some(worker) => worker,
        None => &dispatcher,
    };

    let mut writer = args
        .annotate
        .as_deref()
        .map(AnnotatedFrameWriter::new)
        .transpose()?;

    let output: Box<dyn ReportOutput> = match args.format() {
        OutputFormat::Jsonl => Box::new(JsonOutput::stdout()),
        OutputFormat::Json => Box::new(JsonArrayOutput::new(JsonOutput::stdout(), args.pretty)),
    };

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let total = source.count_hint().map(|t| t as u64);
    let progress = ProgressBar::new(total, args.quiet, show_progress);

    let summary = {
        let mut session = Session::new(source.as_mut(), detector.as_mut(), alerts)
            .with_output(output.as_ref())
            .with_progress(&progress);
        if let Some(writer) = writer.as_mut() {
            session = session.with_sink(writer);
        }
        session.run()?
    };

    if let Some(worker) = worker {
        let dropped = worker.dropped();
        let delivered = worker.shutdown();
        info!("{delivered} alerts handed to the gateway");
        if dropped > 0 {
            info!("{dropped} alerts dropped while another was being sent");
        }
    }

    Ok(summary)
}

/// Opens the frame source and hand detector for the configured feed.
fn open_feed(args: &WatchArgs) -> Result<(Box<dyn FrameSource>, Box<dyn HandDetector>)> {
    if args.is_live() {
        if args.frames.is_some() {
            anyhow::bail!("--frames cannot be combined with a live landmark stream");
        }
        let stream = match &args.detector_cmd {
            Some(command) => LandmarkStream::spawn(command)?,
            None => LandmarkStream::stdin(),
        };
        info!("Watching live landmark stream");
        let detector = stream.detector();
        return Ok((Box::new(stream), Box::new(detector)));
    }

    let path = args
        .landmarks
        .as_deref()
        .context("No landmark source: pass --landmarks or --detector-cmd")?;
    let log = LandmarkLog::load(path)?;
    info!(
        "Loaded {} frames of landmarks from {}",
        log.len(),
        path.display()
    );

    let source: Box<dyn FrameSource> = match &args.frames {
        Some(dir) => {
            let frames = FsFrameSource::open(dir, args.frame_rate())?;
            Box::new(frames.mirrored(!args.no_mirror))
        }
        None => Box::new(log.timeline(args.frame_rate())?),
    };
    Ok((source, Box::new(log)))
}

fn build_gateway(args: &WatchArgs) -> Result<Arc<dyn AlertGateway>> {
    if args.dry_run {
        info!("Dry run: alerts will be logged, not sent");
        return Ok(Arc::new(LogGateway::new()));
    }

    let mut config = TwilioConfig::from_env().context(
        "SMS credentials missing (set TWILIO_* in the environment or .env, or pass --dry-run)",
    )?;
    if let Some(base) = &args.api_base {
        config = config.with_api_base(base);
    }
    debug!("Using {config:?}");
    Ok(Arc::new(TwilioGateway::new(config)?))
}
