//! Integration tests for live landmark streams.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::{self, BufReader, Read};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use help_signal_adapters::LandmarkStream;
use help_signal_core::domain::Handedness;
use help_signal_core::{AlertRequest, AlertSink, FrameSource, HandDetector, Session};
use help_signal_test_support::HandBuilder;

fn record(frame: u64, timestamp_ms: u64, hands: &[HandBuilder]) -> String {
    let mut line = serde_json::json!({
        "frame": frame,
        "timestamp_ms": timestamp_ms,
        "hands": hands.iter().map(HandBuilder::to_json).collect::<Vec<_>>(),
    })
    .to_string();
    line.push('\n');
    line
}

/// Reader fed line by line from another thread; EOF once the sender is gone.
struct ChannelReader {
    lines: Receiver<String>,
    buf: Vec<u8>,
    pos: usize,
}

impl Read for ChannelReader {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if self.pos == self.buf.len() {
            match self.lines.recv() {
                Ok(line) => {
                    self.buf = line.into_bytes();
                    self.pos = 0;
                }
                Err(_) => return Ok(0),
            }
        }
        let n = out.len().min(self.buf.len() - self.pos);
        out[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

fn channel_stream() -> (Sender<String>, LandmarkStream) {
    let (tx, rx) = mpsc::channel();
    let reader = ChannelReader {
        lines: rx,
        buf: Vec::new(),
        pos: 0,
    };
    (tx, LandmarkStream::new(BufReader::new(reader)))
}

/// Alert sink that reports each alert over a channel.
struct SignallingSink(Mutex<Sender<AlertRequest>>);

impl AlertSink for SignallingSink {
    fn raise(&self, request: &AlertRequest) {
        self.0.lock().unwrap().send(*request).unwrap();
    }
}

#[test]
fn test_alert_fires_while_stream_is_open() {
    let (lines, mut stream) = channel_stream();
    let mut detector = stream.detector();
    let (alert_tx, alert_rx) = mpsc::channel();
    let sink = SignallingSink(Mutex::new(alert_tx));

    let producer = thread::spawn(move || {
        let open = HandBuilder::open_tucked(Handedness::Right);
        let fist = HandBuilder::fist(Handedness::Right);
        lines.send(record(0, 0, &[open])).unwrap();
        lines.send(record(1, 100, &[fist.clone()])).unwrap();
        lines.send(record(2, 5_000, &[fist])).unwrap();

        // The stream stays open until the alert has been seen.
        let alert = alert_rx.recv_timeout(Duration::from_secs(10));
        drop(lines);
        alert
    });

    let summary = Session::new(&mut stream, &mut detector, &sink)
        .run()
        .unwrap();

    let alert = producer
        .join()
        .unwrap()
        .expect("alert raised before the stream closed");
    assert_eq!(alert.frame, 2);
    assert_eq!(alert.held, Duration::from_secs(5));
    assert_eq!(summary.frames, 3);
    assert_eq!(summary.alerts, 1);
}

#[test]
fn test_detector_reads_hands_of_each_frame() {
    let input = [
        record(7, 0, &[HandBuilder::fist(Handedness::Left)]),
        record(8, 40, &[]),
    ]
    .concat();
    let mut stream = LandmarkStream::new(io::Cursor::new(input.into_bytes()));
    let mut detector = stream.detector();

    let frame = stream.next_frame().unwrap().unwrap();
    assert_eq!(frame.index, 7);
    let hands = detector.detect(&frame).unwrap();
    assert_eq!(hands.len(), 1);
    assert_eq!(hands[0].handedness, Handedness::Left);

    let frame = stream.next_frame().unwrap().unwrap();
    assert_eq!(frame.timestamp, Duration::from_millis(40));
    assert!(detector.detect(&frame).unwrap().is_empty());
    assert!(stream.next_frame().unwrap().is_none());
}

#[cfg(unix)]
#[test]
fn test_spawned_producer_is_streamed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hands.jsonl");
    let hand = HandBuilder::relaxed(Handedness::Right);
    std::fs::write(&path, record(0, 0, &[hand])).unwrap();

    let mut stream = LandmarkStream::spawn(&format!("cat {}", path.display())).unwrap();
    let mut detector = stream.detector();

    let frame = stream.next_frame().unwrap().unwrap();
    assert_eq!(detector.detect(&frame).unwrap().len(), 1);
    assert!(stream.next_frame().unwrap().is_none());
}

#[test]
fn test_missing_producer_is_an_error() {
    let err = LandmarkStream::spawn("help-signal-no-such-producer --camera 0")
        .err()
        .expect("spawn fails");
    assert!(err.to_string().contains("help-signal-no-such-producer"));
}
