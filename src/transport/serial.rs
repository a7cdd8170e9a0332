//! `serialport`-backed [`AdapterLink`] for real ELM327 hardware
//!
//! Grounded on the teacher crate's own serial hardware module
//! (`hardware/slcan/device.rs`): open a port, read byte-by-byte until a
//! line terminator, write commands with the adapter's expected
//! terminator appended. Unlike the teacher's SLCAN device this only
//! speaks ELM327's line-oriented AT-command/ASCII-hex protocol — it does
//! not decode CAN frames itself, that's `crate::frame`'s job once lines
//! reach the core.

use std::io::{Read, Write};
use std::time::Duration;

use super::{AdapterLink, TransportError, TransportResult};

/// ELM327 uses carriage return as a command terminator and `>` as its
/// ready-for-input prompt, which also terminates a response.
const LINE_TERMINATOR: u8 = b'\r';
const PROMPT: u8 = b'>';
const MAX_LINE_LEN: usize = 256;

/// AT-command sequence this crate sends to negotiate a clean, automatic
/// session: reset, echo off, linefeeds off, spaces off, headers ON (this
/// core needs header bytes to decode tx/rx ids), automatic protocol
/// detection.
pub const NEGOTIATION_SEQUENCE: &[&str] =
    &["ATZ", "ATE0", "ATL0", "ATS0", "ATH1", "ATSP0"];

/// A serial connection to an ELM327-compatible adapter.
pub struct SerialAdapterLink {
    port: Box<dyn serialport::SerialPort>,
}

impl std::fmt::Debug for SerialAdapterLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialAdapterLink")
            .field("port", &self.port.name())
            .finish()
    }
}

impl SerialAdapterLink {
    /// Opens `path` at `baud_rate`, applying `timeout` to all reads and
    /// writes. Does not negotiate a session — call [`Self::negotiate`] (or
    /// send your own AT commands) afterwards.
    pub fn open(path: &str, baud_rate: u32, timeout: Duration) -> TransportResult<Self> {
        let port = serialport::new(path, baud_rate)
            .timeout(timeout)
            .open()
            .map_err(|e| TransportError::Io(std::io::Error::other(e)))?;
        Ok(Self { port })
    }

    /// Runs [`NEGOTIATION_SEQUENCE`], discarding each command's response.
    /// Thin by design (spec.md §1): it does not validate that the adapter
    /// acknowledged each command, and does not retry on failure — an
    /// upstream layer that cares about that should drive the sequence
    /// itself via [`AdapterLink::write_read`].
    pub fn negotiate(&mut self) -> TransportResult<()> {
        for cmd in NEGOTIATION_SEQUENCE {
            log::debug!("sending negotiation command {cmd}");
            self.write_read(cmd)?;
        }
        Ok(())
    }
}

impl AdapterLink for SerialAdapterLink {
    fn write_line(&mut self, line: &str) -> TransportResult<()> {
        self.port.write_all(line.as_bytes())?;
        self.port.write_all(&[LINE_TERMINATOR])?;
        self.port.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> TransportResult<String> {
        let mut buf = Vec::with_capacity(32);
        let mut byte = [0u8; 1];
        loop {
            match self.port.read(&mut byte) {
                Ok(0) => return Err(TransportError::Timeout),
                Ok(_) => {
                    match byte[0] {
                        LINE_TERMINATOR => {
                            if !buf.is_empty() {
                                break;
                            }
                        }
                        PROMPT => break,
                        b => {
                            if buf.len() == MAX_LINE_LEN {
                                break;
                            }
                            buf.push(b);
                        }
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {
                    return Err(TransportError::Timeout)
                }
                Err(e) => return Err(TransportError::Io(e)),
            }
        }
        Ok(String::from_utf8_lossy(&buf).trim().to_string())
    }
}
