//! Line codec for the emulator console protocol
//!
//! Commands are single ASCII lines terminated by `\n`. The console answers
//! with any number of informational lines followed by a terminator line:
//!
//! ```text
//! Android Console: type 'help' for a list of commands
//! OK
//! ```
//!
//! or `KO` optionally followed by `:` or a space and a message. Lines may
//! end in `\r\n`. The decoder buffers partial lines across reads, so a reply
//! may arrive one byte at a time or several replies in a single read.

use crate::gait::Vector3;
use std::collections::VecDeque;
use std::fmt;

/// Longest line accepted from the console (guards against an endless line)
pub const MAX_LINE_LENGTH: usize = 4096;

/// Sensor name of the accelerometer in `sensor set`
pub const ACCELERATION_SENSOR: &str = "acceleration";

/// Outcome carried by a terminator line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ok,
    /// `KO` with its message (empty when the console sent a bare `KO`)
    Ko(String),
}

/// A complete console reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: Status,
    /// Lines received before the terminator
    pub body: Vec<String>,
}

impl Reply {
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

/// Commands this client sends
#[derive(Debug, Clone, PartialEq)]
pub enum Command<'a> {
    Auth(&'a str),
    SensorSet { sensor: &'a str, value: Vector3 },
    Quit,
}

impl Command<'_> {
    /// Wire form including the trailing newline
    pub fn encode(&self) -> String {
        format!("{}\n", self)
    }
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Auth(token) => write!(f, "auth {}", token),
            Command::SensorSet { sensor, value } => write!(
                f,
                "sensor set {} {:.2}:{:.2}:{:.2}",
                sensor, value.x, value.y, value.z
            ),
            Command::Quit => write!(f, "quit"),
        }
    }
}

/// Classify a single line (without its line ending)
///
/// Returns `None` for informational lines.
pub fn parse_terminator(line: &str) -> Option<Status> {
    let line = line.trim_end();
    if line == "OK" {
        return Some(Status::Ok);
    }
    let rest = line.strip_prefix("KO")?;
    if rest.is_empty() {
        return Some(Status::Ko(String::new()));
    }
    if rest.starts_with(':') || rest.starts_with(' ') {
        let message = rest.trim_start_matches(':').trim();
        return Some(Status::Ko(message.to_string()));
    }
    None
}

/// Line-too-long error from [`LineCodec::feed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTooLong;

/// Streaming reply decoder
///
/// # Example
/// ```
/// use mockstep_core::console::codec::{LineCodec, Status};
///
/// let mut codec = LineCodec::new();
/// codec.feed(b"Android Console: ready\r\nO").unwrap();
/// assert!(codec.next_reply().is_none());
///
/// codec.feed(b"K\r\n").unwrap();
/// let reply = codec.next_reply().unwrap();
/// assert_eq!(reply.status, Status::Ok);
/// assert_eq!(reply.body, vec!["Android Console: ready".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct LineCodec {
    /// Bytes of the line currently being received
    partial: Vec<u8>,
    /// Complete non-terminator lines of the reply in progress
    body: Vec<String>,
    /// Replies decoded but not yet taken
    ready: VecDeque<Reply>,
}

impl LineCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed received bytes into the decoder
    ///
    /// On error the offending partial line is discarded; replies decoded
    /// before it stay available.
    pub fn feed(&mut self, data: &[u8]) -> Result<(), LineTooLong> {
        for &byte in data {
            if byte == b'\n' {
                let raw = std::mem::take(&mut self.partial);
                let line = String::from_utf8_lossy(&raw);
                let line = line.strip_suffix('\r').unwrap_or(&line);
                self.push_line(line);
            } else {
                if self.partial.len() >= MAX_LINE_LENGTH {
                    self.partial.clear();
                    return Err(LineTooLong);
                }
                self.partial.push(byte);
            }
        }
        Ok(())
    }

    fn push_line(&mut self, line: &str) {
        match parse_terminator(line) {
            Some(status) => {
                let body = std::mem::take(&mut self.body);
                self.ready.push_back(Reply { status, body });
            }
            None => self.body.push(line.to_string()),
        }
    }

    /// Take the oldest complete reply
    pub fn next_reply(&mut self) -> Option<Reply> {
        self.ready.pop_front()
    }

    /// Lines received since the last terminator
    pub fn pending_lines(&self) -> &[String] {
        &self.body
    }

    /// Whether any bytes or lines are waiting for a terminator
    pub fn has_partial(&self) -> bool {
        !self.partial.is_empty() || !self.body.is_empty()
    }
}
