//! Capture → detect → classify → track loop.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::classifier::classify;
use crate::domain::{FrameReport, GestureEvent, HandReport, TrackId};
use crate::gesture::GestureMonitor;
use crate::ports::{
    AlertRequest, AlertSink, FrameOverlay, FrameSink, FrameSource, HandDetector, HandOverlay,
    ProgressEvent, ProgressSink, ReportOutput,
};

/// Totals for a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSummary {
    /// Frames read and processed.
    pub frames: u64,
    /// Frames that failed to read.
    pub skipped: u64,
    /// Hand detections classified.
    pub hands: u64,
    /// Alerts raised.
    pub alerts: u64,
}

/// Wires the ports together and runs the recognition loop.
///
/// The loop is single-threaded: gesture state lives here and is only touched
/// between frames. Alert delivery is whatever the [`AlertSink`] makes of it.
pub struct Session<'a> {
    source: &'a mut dyn FrameSource,
    detector: &'a mut dyn HandDetector,
    alerts: &'a dyn AlertSink,
    sink: Option<&'a mut dyn FrameSink>,
    output: Option<&'a dyn ReportOutput>,
    progress: Option<&'a dyn ProgressSink>,
    monitor: GestureMonitor,
}

impl<'a> Session<'a> {
    #[must_use]
    pub fn new(
        source: &'a mut dyn FrameSource,
        detector: &'a mut dyn HandDetector,
        alerts: &'a dyn AlertSink,
    ) -> Self {
        Self {
            source,
            detector,
            alerts,
            sink: None,
            output: None,
            progress: None,
            monitor: GestureMonitor::new(),
        }
    }

    /// Renders every processed frame to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: &'a mut dyn FrameSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Writes a report for every frame containing hands to `output`.
    #[must_use]
    pub fn with_output(mut self, output: &'a dyn ReportOutput) -> Self {
        self.output = Some(output);
        self
    }

    /// Sends progress events to `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Gesture state accumulated so far.
    #[must_use]
    pub const fn monitor(&self) -> &GestureMonitor {
        &self.monitor
    }

    /// Runs until the frame source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the detector fails, a landmark set is malformed,
    /// or rendering or report output fails. Frame read failures are skipped.
    pub fn run(&mut self) -> Result<SessionSummary> {
        let total = self.source.count_hint();
        let mut summary = SessionSummary::default();

        loop {
            let frame = match self.source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to read frame: {e:#}");
                    self.emit(ProgressEvent::Skipped {
                        reason: format!("{e:#}"),
                    });
                    summary.skipped += 1;
                    continue;
                }
            };

            self.emit(ProgressEvent::Frame {
                index: frame.index,
                total,
            });

            let detections = self
                .detector
                .detect(&frame)
                .with_context(|| format!("Hand detection failed on frame {}", frame.index))?;

            let mut report = FrameReport {
                frame: frame.index,
                timestamp_ms: duration_ms(frame.timestamp),
                hands: Vec::with_capacity(detections.len()),
            };
            let mut overlay = FrameOverlay::default();

            for (i, detection) in detections.into_iter().enumerate() {
                let track = TrackId(i);
                let pose = classify(&detection.landmarks, detection.handedness).with_context(
                    || format!("Malformed landmarks for {track} on frame {}", frame.index),
                )?;
                let event = self.monitor.observe(track, pose, frame.timestamp);
                let phase = self.monitor.phase(track);
                summary.hands += 1;

                if let GestureEvent::Triggered { held } = event {
                    self.alerts.raise(&AlertRequest {
                        frame: frame.index,
                        track,
                        handedness: detection.handedness,
                        held,
                    });
                    summary.alerts += 1;
                    self.emit(ProgressEvent::Alerted {
                        frame: frame.index,
                        track,
                    });
                }

                report.hands.push(HandReport {
                    track,
                    handedness: detection.handedness,
                    pose,
                    event,
                    phase,
                });
                overlay.hands.push(HandOverlay {
                    handedness: detection.handedness,
                    landmarks: detection.landmarks,
                    phase,
                });
            }

            if let Some(sink) = self.sink.as_mut() {
                sink.present(&frame, &overlay)
                    .with_context(|| format!("Failed to render frame {}", frame.index))?;
            }

            if let Some(output) = self.output {
                if !report.hands.is_empty() {
                    output.write(&report)?;
                }
            }

            summary.frames += 1;
        }

        if let Some(output) = self.output {
            output.flush()?;
        }

        info!(
            "Session finished: {} frames, {} skipped, {} alerts",
            summary.frames, summary.skipped, summary.alerts
        );
        debug!(
            "{} tracks seen, {} still mid-gesture",
            self.monitor.len(),
            self.monitor.armed_count()
        );

        self.emit(ProgressEvent::Finished {
            frames: summary.frames,
            skipped: summary.skipped,
            alerts: summary.alerts,
        });

        Ok(summary)
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(progress) = self.progress {
            progress.on_event(event);
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
