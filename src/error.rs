//! Construction-time errors
//!
//! The core's per-batch parsing pipeline never fails (spec.md §7: frame
//! and message drops are logged, never propagated). But *selecting* a
//! protocol can fail, if the adapter reports a protocol number this crate
//! doesn't recognize, or reports a legacy protocol with no CAN-family
//! frame decoder (spec.md §9). [`ProtocolError`] covers that boundary, in
//! the style the teacher crate uses at its own adapter boundaries (e.g.
//! `SlCanError`).

use crate::protocol::LegacyProtocol;

/// Error produced when resolving or constructing a [`crate::protocol::Protocol`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The adapter reported a protocol-number character this crate has no
    /// entry for at all.
    #[error("unrecognized ELM protocol id {0:?}")]
    UnknownElmId(char),
    /// The adapter reported a legacy protocol this crate tags but does not
    /// implement a frame decoder for.
    #[error("legacy protocol {0} has no CAN-family frame decoder")]
    Unsupported(LegacyProtocol),
}
