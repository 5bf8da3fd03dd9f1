//! Classify command - print hand shape predicates without tracking gestures.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use help_signal_adapters::LandmarkLog;
use help_signal_core::{classify, Handedness, ReportOutput, TrackId};
use serde::Serialize;

use crate::output::JsonOutput;

/// Arguments for the classify command.
#[derive(Args, Clone)]
pub struct ClassifyArgs {
    /// Landmark log (JSON Lines) recorded by the hand landmark model
    #[arg(long, value_name = "FILE")]
    pub landmarks: PathBuf,
}

/// One classified hand.
#[derive(Debug, Serialize)]
struct ClassifiedHand {
    frame: u64,
    track: TrackId,
    handedness: Handedness,
    thumb_tucked: bool,
    fingers_outstretched: bool,
    fist: bool,
    open_hand: bool,
}

/// Run the classify command, returning the number of hands classified.
pub fn run(args: &ClassifyArgs) -> Result<usize> {
    let log = LandmarkLog::load(&args.landmarks)?;
    let output = JsonOutput::stdout();
    let mut count = 0;

    for frame in log.frames() {
        for (i, hand) in log.hands(frame).iter().enumerate() {
            let track = TrackId(i);
            let pose = classify(&hand.landmarks, hand.handedness)
                .with_context(|| format!("Malformed landmarks for {track} on frame {frame}"))?;
            output.write_line(&ClassifiedHand {
                frame,
                track,
                handedness: hand.handedness,
                thumb_tucked: pose.thumb_tucked,
                fingers_outstretched: pose.outstretched,
                fist: pose.fist,
                open_hand: pose.is_open_hand(),
            })?;
            count += 1;
        }
    }

    output.flush()?;
    Ok(count)
}
