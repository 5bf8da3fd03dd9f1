//! Shared helpers for CLI integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use assert_cmd::Command;
use help_signal_core::domain::Handedness;
use help_signal_test_support::HandBuilder;

/// Command for the binary, isolated from the user's config and credentials.
pub fn help_signal(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("help-signal").unwrap();
    cmd.current_dir(cwd)
        .env("XDG_CONFIG_HOME", cwd.join("xdg"))
        .env("NO_PROXY", "127.0.0.1")
        .env("no_proxy", "127.0.0.1");
    for var in ["TWILIO_SID", "TWILIO_AUTH_TOKEN", "TWILIO_FROM", "TWILIO_TO"] {
        cmd.env_remove(var);
    }
    cmd
}

/// One landmark log line.
pub fn record(frame: u64, timestamp_ms: Option<u64>, hands: &[HandBuilder]) -> String {
    let mut value = serde_json::json!({
        "frame": frame,
        "hands": hands.iter().map(HandBuilder::to_json).collect::<Vec<_>>(),
    });
    if let Some(ms) = timestamp_ms {
        value["timestamp_ms"] = ms.into();
    }
    value.to_string()
}

/// Writes a log to `dir/name` and returns its path.
pub fn write_log(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, lines.join("\n")).unwrap();
    path
}

/// Open hand, three quick fists, then a fist five seconds after the open hand.
pub fn help_sequence() -> Vec<String> {
    let open = HandBuilder::open_tucked(Handedness::Right);
    let fist = HandBuilder::fist(Handedness::Right);
    vec![
        record(0, Some(0), &[open]),
        record(1, Some(100), std::slice::from_ref(&fist)),
        record(2, Some(200), std::slice::from_ref(&fist)),
        record(3, Some(5_000), &[fist]),
    ]
}

/// Parses JSON Lines output.
pub fn parse_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

/// Serves exactly one HTTP request with `status` and `body`; returns the
/// base URL and a handle yielding the raw request.
pub fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
        request
    });

    (base, handle)
}

fn read_request(stream: &mut impl Read) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let length = text[..header_end]
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8(buf).unwrap()
}
