//! Serial line sensor source
//!
//! The sensor controller prints one line per measurement:
//!
//! ```text
//! Temperature: 23.4, Humidity: 51.2
//! ```
//!
//! The port itself is abstracted as [`BufRead`] / [`Write`], so a serial
//! port handle, a TCP stream, or an in-memory buffer all work.

use crate::{source::RawSample, CollectError, ReadingSource};
use log::{debug, warn};
use std::io::{BufRead, ErrorKind, Write};
use thiserror::Error;

/// Why a sensor line was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line lacks Temperature/Humidity labels")]
    MissingLabels,

    #[error("missing {0} field")]
    MissingField(&'static str),

    #[error("invalid {field} value {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Parse `"Temperature: XX.X, Humidity: YY.Y"`
///
/// Both labels must appear somewhere in the line. The first comma separates
/// the fields and each value follows the first colon of its field.
pub fn parse_sensor_line(line: &str) -> Result<RawSample, ParseError> {
    let line = line.trim();
    if !(line.contains("Temperature") && line.contains("Humidity")) {
        return Err(ParseError::MissingLabels);
    }

    let mut parts = line.split(',');
    let temperature = field_value(parts.next(), "temperature")?;
    let humidity = field_value(parts.next(), "humidity")?;

    Ok(RawSample::new(temperature, humidity))
}

fn field_value(part: Option<&str>, field: &'static str) -> Result<f64, ParseError> {
    let raw = part
        .and_then(|p| p.split(':').nth(1))
        .ok_or(ParseError::MissingField(field))?
        .trim();

    raw.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

/// Bytes for a controller command
pub fn format_command(command: &str) -> Vec<u8> {
    format!("{}\n", command).into_bytes()
}

/// Send a command and collect the reply
///
/// Reply lines are trimmed and concatenated. Reading stops at end of input or
/// when the port times out.
pub fn send_command<W, R>(writer: &mut W, reader: &mut R, command: &str) -> Result<String, CollectError>
where
    W: Write,
    R: BufRead,
{
    writer.write_all(&format_command(command))?;
    writer.flush()?;

    let mut response = String::new();
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => response.push_str(line.trim()),
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => break,
            Err(e) => return Err(e.into()),
        }
    }

    debug!("Command {:?} answered with {:?}", command, response);
    Ok(response)
}

/// Line counters for a [`SerialSource`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SerialStats {
    /// Lines successfully parsed
    pub parsed: u64,
    /// Lines rejected by the parser
    pub malformed: u64,
    /// Polls that found no data
    pub empty: u64,
    /// Polls that failed to read
    pub io_errors: u64,
}

/// [`ReadingSource`] reading one sensor line per poll
#[derive(Debug)]
pub struct SerialSource<R> {
    reader: R,
    line: String,
    stats: SerialStats,
}

impl<R: BufRead> SerialSource<R> {
    /// Wrap a port reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            stats: SerialStats::default(),
        }
    }

    /// Line counters so far
    pub fn stats(&self) -> SerialStats {
        self.stats
    }

    /// Give back the reader
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> ReadingSource for SerialSource<R> {
    fn poll(&mut self) -> Result<Option<RawSample>, CollectError> {
        self.line.clear();

        match self.reader.read_line(&mut self.line) {
            Ok(0) => {
                self.stats.empty += 1;
                debug!("No serial data waiting");
                Ok(None)
            }
            Ok(_) => match parse_sensor_line(&self.line) {
                Ok(sample) => {
                    self.stats.parsed += 1;
                    Ok(Some(sample))
                }
                Err(e) => {
                    self.stats.malformed += 1;
                    warn!("Error parsing serial data: {} (raw data: {:?})", e, self.line.trim());
                    Ok(None)
                }
            },
            Err(e) => {
                self.stats.io_errors += 1;
                warn!("Serial read error: {}", e);
                Ok(None)
            }
        }
    }

    fn name(&self) -> &'static str {
        "serial"
    }
}
