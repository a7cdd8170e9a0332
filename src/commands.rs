//! The bare minimum of the OBD command registry this crate needs
//!
//! spec.md names "the catalog of OBD commands (mode/PID tables) and their
//! value-decoding functions" as an external collaborator, entirely out of
//! scope (spec.md §1). This module supplies only the one request the core
//! itself depends on — constructing a [`crate::driver::ProtocolDriver`]
//! requires the raw `0100` response — and nothing else. Callers that need
//! the rest of the PID catalog or value decoding should bring their own
//! command/decoder crate.

/// Mode 01, PID `00`: "supported PIDs 01-20". The response to this request
/// is what [`crate::driver::ProtocolDriver::new`] uses to populate its ECU
/// map (spec.md §4.3).
pub const MODE1_SUPPORTED_PIDS_0100: &str = "0100";
