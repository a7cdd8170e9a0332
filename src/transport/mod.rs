//! Serial transport — thin glue between an ELM327-style adapter and the core
//!
//! spec.md places "serial port management and AT-command negotiation" out
//! of scope for the parsing core as an external collaborator, but names it
//! as one of the four real surrounding components (spec.md §1). This
//! module is deliberately thin: it opens a link, negotiates automatic
//! protocol detection, and yields raw lines — it does not retry, does not
//! enforce timeouts beyond what the underlying port gives it, and does not
//! interpret adapter responses beyond passing them through to
//! [`crate::driver::ProtocolDriver`].

#[cfg(feature = "serial")]
pub mod serial;

/// Result type for [`AdapterLink`] operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Error produced by an [`AdapterLink`].
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Underlying I/O error opening or using the link.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The adapter did not answer within the configured timeout.
    #[error("timed out waiting for adapter response")]
    Timeout,
}

/// A line-oriented connection to an ELM327-compatible adapter.
///
/// The core never implements this trait itself — it is pure glue for
/// whatever is feeding it raw lines (spec.md §1, §5: "the upstream
/// transport is responsible for bounding reads before handing raw lines to
/// the core").
pub trait AdapterLink {
    /// Writes one command line to the adapter. Implementations append
    /// whatever line terminator the adapter expects.
    fn write_line(&mut self, line: &str) -> TransportResult<()>;

    /// Blocks until one full response line (up to the adapter's prompt or
    /// line terminator) is available, and returns it.
    fn read_line(&mut self) -> TransportResult<String>;

    /// Sends `line` and reads back the adapter's immediate response.
    fn write_read(&mut self, line: &str) -> TransportResult<String> {
        self.write_line(line)?;
        self.read_line()
    }
}
