//! Mock implementations of core port traits.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use help_signal_core::alert::DispatchError;
use help_signal_core::domain::{Frame, FrameReport, HandDetection};
use help_signal_core::ports::{
    AlertGateway, AlertRequest, AlertSink, DeliveryReceipt, FrameOverlay, FrameSink, FrameSource,
    HandDetector, ProgressEvent, ProgressSink, ReportOutput,
};

/// Mock implementation of `FrameSource` for testing.
///
/// Yields a scripted sequence of frames and read failures.
pub struct MockFrameSource {
    frames: VecDeque<anyhow::Result<Frame>>,
    total: usize,
}

impl MockFrameSource {
    /// Creates a source yielding the given frames in order.
    #[must_use]
    pub fn new(frames: Vec<Frame>) -> Self {
        Self::scripted(frames.into_iter().map(Ok).collect())
    }

    /// Creates a source yielding frames and errors in order.
    #[must_use]
    pub fn scripted(items: Vec<anyhow::Result<Frame>>) -> Self {
        let total = items.len();
        Self {
            frames: items.into(),
            total,
        }
    }

    /// Creates an empty source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Number of items not yet read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for MockFrameSource {
    fn next_frame(&mut self) -> anyhow::Result<Option<Frame>> {
        self.frames.pop_front().transpose()
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.total)
    }
}

/// Mock implementation of `HandDetector` for testing.
///
/// Returns one scripted detection list per call; once the script runs out,
/// every frame has no hands.
#[derive(Default)]
pub struct MockHandDetector {
    script: VecDeque<Vec<HandDetection>>,
    calls: Vec<u64>,
    fail_on: Option<u64>,
}

impl MockHandDetector {
    /// Creates a detector answering with `script`, one entry per frame.
    #[must_use]
    pub fn new(script: Vec<Vec<HandDetection>>) -> Self {
        Self {
            script: script.into(),
            ..Self::default()
        }
    }

    /// Makes detection fail on the frame with the given index.
    #[must_use]
    pub fn failing_on(mut self, frame: u64) -> Self {
        self.fail_on = Some(frame);
        self
    }

    /// Frame indices passed to `detect`, in call order.
    #[must_use]
    pub fn calls(&self) -> &[u64] {
        &self.calls
    }
}

impl HandDetector for MockHandDetector {
    fn detect(&mut self, frame: &Frame) -> anyhow::Result<Vec<HandDetection>> {
        self.calls.push(frame.index);
        if self.fail_on == Some(frame.index) {
            anyhow::bail!("inference failed on frame {}", frame.index);
        }
        Ok(self.script.pop_front().unwrap_or_default())
    }
}

/// Mock implementation of `AlertGateway` for testing.
///
/// Records every body sent; can be switched into a failing mode.
#[derive(Clone, Default)]
pub struct MockAlertGateway {
    sent: Arc<Mutex<Vec<String>>>,
    failure: Option<DispatchError>,
}

impl MockAlertGateway {
    /// Creates a gateway that accepts every message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway that records each attempt and then fails with `error`.
    #[must_use]
    pub fn failing(error: DispatchError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Bodies of all send attempts.
    #[must_use]
    pub fn sent(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of send attempts.
    #[must_use]
    pub fn send_count(&self) -> usize {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl AlertGateway for MockAlertGateway {
    fn send(&self, body: &str) -> Result<DeliveryReceipt, DispatchError> {
        let count = {
            let mut sent = self.sent.lock().unwrap_or_else(PoisonError::into_inner);
            sent.push(body.to_string());
            sent.len()
        };
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(DeliveryReceipt {
                id: format!("SM{count:032}"),
                status: "queued".into(),
            }),
        }
    }
}

/// Mock implementation of `AlertSink` for testing.
///
/// Captures raised alerts without delivering anything.
#[derive(Default)]
pub struct MockAlertSink {
    raised: Mutex<Vec<AlertRequest>>,
}

impl MockAlertSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All raised alerts.
    #[must_use]
    pub fn raised(&self) -> Vec<AlertRequest> {
        self.raised
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AlertSink for MockAlertSink {
    fn raise(&self, request: &AlertRequest) {
        self.raised
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*request);
    }
}

/// Mock implementation of `FrameSink` for testing.
///
/// Records the frame index and hand count of every presented frame.
#[derive(Default)]
pub struct MockFrameSink {
    presented: Vec<(u64, usize)>,
}

impl MockFrameSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `(frame index, hands drawn)` per presented frame.
    #[must_use]
    pub fn presented(&self) -> &[(u64, usize)] {
        &self.presented
    }
}

impl FrameSink for MockFrameSink {
    fn present(&mut self, frame: &Frame, overlay: &FrameOverlay) -> anyhow::Result<()> {
        self.presented.push((frame.index, overlay.hands.len()));
        Ok(())
    }
}

/// Mock implementation of `ReportOutput` for testing.
///
/// Captures reports for later assertions.
pub struct MockReportOutput {
    reports: Arc<Mutex<Vec<FrameReport>>>,
    flush_count: Arc<Mutex<usize>>,
}

impl MockReportOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reports: Arc::new(Mutex::new(Vec::new())),
            flush_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns all captured reports.
    #[must_use]
    pub fn reports(&self) -> Vec<FrameReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockReportOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportOutput for MockReportOutput {
    fn write(&self, report: &FrameReport) -> anyhow::Result<()> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        if let Ok(mut c) = self.flush_count.lock() {
            *c += 1;
        }
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Frame` events.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Frame { .. }))
            .count()
    }

    /// Returns the number of `Skipped` events.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Skipped { .. }))
            .count()
    }

    /// Returns the final counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(u64, u64, u64)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished {
                frames,
                skipped,
                alerts,
            } => Some((*frames, *skipped, *alerts)),
            _ => None,
        })
    }
}

impl Default for MockProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::FrameBuilder;

    #[test]
    fn test_mock_frame_source_empty() {
        let mut source = MockFrameSource::empty();
        assert_eq!(source.count_hint(), Some(0));
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_mock_frame_source_scripted_error() {
        let mut source = MockFrameSource::scripted(vec![
            Err(anyhow::anyhow!("device busy")),
            Ok(FrameBuilder::bare(1, 0.0)),
        ]);
        assert!(source.next_frame().is_err());
        assert_eq!(source.next_frame().unwrap().unwrap().index, 1);
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn test_mock_gateway_records_and_fails() {
        let gateway = MockAlertGateway::failing(DispatchError::Transport("down".into()));
        assert!(gateway.send("hello").is_err());
        assert_eq!(gateway.sent(), vec!["hello".to_string()]);
    }

    #[test]
    fn test_mock_detector_runs_dry() {
        let mut detector = MockHandDetector::new(vec![vec![]]);
        let frame = FrameBuilder::bare(0, 0.0);
        assert!(detector.detect(&frame).unwrap().is_empty());
        assert!(detector.detect(&frame).unwrap().is_empty());
        assert_eq!(detector.calls(), &[0, 0]);
    }
}
