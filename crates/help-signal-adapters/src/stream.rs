//! Live landmark stream: one JSON Lines record per frame, read as it arrives.
//!
//! Records use the same format as a landmark log. The stream is both the
//! frame source and the detector: [`LandmarkStream::next_frame`] reads the
//! next record and parks its hands until [`StreamDetector::detect`] collects
//! them for the same frame.

use std::cell::RefCell;
use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use help_signal_core::{Frame, FrameSource, HandDetection, HandDetector};
use tracing::{debug, info, warn};

use crate::landmarks::parse_record;

type Pending = Rc<RefCell<Option<(u64, Vec<HandDetection>)>>>;

/// Frame source fed by a live landmark producer.
///
/// Frames without a `timestamp_ms` are stamped with the time elapsed since
/// the stream was opened.
pub struct LandmarkStream {
    reader: Box<dyn BufRead>,
    child: Option<Child>,
    pending: Pending,
    line_no: usize,
    started: Instant,
    done: bool,
}

impl LandmarkStream {
    /// Streams records from any reader.
    pub fn new(reader: impl BufRead + 'static) -> Self {
        Self {
            reader: Box::new(reader),
            child: None,
            pending: Rc::new(RefCell::new(None)),
            line_no: 0,
            started: Instant::now(),
            done: false,
        }
    }

    /// Streams records from standard input.
    #[must_use]
    pub fn stdin() -> Self {
        Self::new(BufReader::new(std::io::stdin()))
    }

    /// Starts a landmark producer and streams its standard output.
    ///
    /// `command` is a program followed by its arguments, separated by
    /// whitespace. The producer is killed when the stream is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if `command` is empty or the process cannot be started.
    pub fn spawn(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace();
        let program = parts.next().context("Detector command is empty")?;

        info!("Starting landmark producer: {command}");
        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("Failed to start landmark producer '{program}'"))?;
        let stdout = child
            .stdout
            .take()
            .context("Landmark producer has no stdout")?;

        let mut stream = Self::new(BufReader::new(stdout));
        stream.child = Some(child);
        Ok(stream)
    }

    /// Detector handing out the hands of the frame just read.
    #[must_use]
    pub fn detector(&self) -> StreamDetector {
        StreamDetector {
            pending: Rc::clone(&self.pending),
        }
    }

    fn finish(&mut self) {
        self.done = true;
        if let Some(mut child) = self.child.take() {
            match child.wait() {
                Ok(status) if status.success() => debug!("Landmark producer exited"),
                Ok(status) => warn!("Landmark producer exited with {status}"),
                Err(e) => warn!("Failed to wait for landmark producer: {e}"),
            }
        }
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl FrameSource for LandmarkStream {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.done {
            return Ok(None);
        }

        let mut line = String::new();
        loop {
            line.clear();
            let read = match self.reader.read_line(&mut line) {
                Ok(read) => read,
                Err(e) => {
                    self.finish();
                    return Err(e).context("Failed to read landmark stream");
                }
            };
            if read == 0 {
                self.finish();
                return Ok(None);
            }
            self.line_no += 1;
            if !line.trim().is_empty() {
                break;
            }
        }

        let (index, record) =
            parse_record(&line).with_context(|| format!("Line {}", self.line_no))?;
        let timestamp = record.timestamp.unwrap_or_else(|| self.elapsed());
        *self.pending.borrow_mut() = Some((index, record.hands));
        Ok(Some(Frame::bare(index, timestamp)))
    }
}

impl Drop for LandmarkStream {
    fn drop(&mut self) {
        if let Some(child) = self.child.as_mut() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Detector half of a [`LandmarkStream`].
pub struct StreamDetector {
    pending: Pending,
}

impl HandDetector for StreamDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<HandDetection>> {
        let mut pending = self.pending.borrow_mut();
        match pending.take() {
            Some((index, hands)) if index == frame.index => Ok(hands),
            other => {
                *pending = other;
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_and_bad_lines() {
        let input = "\n{\"frame\": 0, \"timestamp_ms\": 5}\nnot json\n\n{\"frame\": 1}\n";
        let mut stream = LandmarkStream::new(input.as_bytes());

        let frame = stream.next_frame().unwrap().unwrap();
        assert_eq!(frame.index, 0);
        assert_eq!(frame.timestamp, Duration::from_millis(5));

        let err = stream.next_frame().unwrap_err();
        assert!(format!("{err:#}").contains("Line 3"), "{err:#}");

        assert_eq!(stream.next_frame().unwrap().unwrap().index, 1);
        assert!(stream.next_frame().unwrap().is_none());
        assert!(stream.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_detector_only_matches_current_frame() {
        let mut stream = LandmarkStream::new("{\"frame\": 4}\n".as_bytes());
        let mut detector = stream.detector();
        stream.next_frame().unwrap();
        assert!(detector.detect(&Frame::bare(3, Duration::ZERO)).unwrap().is_empty());
        assert!(detector.detect(&Frame::bare(4, Duration::ZERO)).unwrap().is_empty());
        assert!(stream.pending.borrow().is_none());
    }

    #[test]
    fn test_spawn_rejects_empty_command() {
        assert!(LandmarkStream::spawn("   ").is_err());
    }
}
