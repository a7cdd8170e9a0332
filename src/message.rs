//! Message assembly — groups per-ECU frames into logical OBD responses
//!
//! Implements spec.md §4.2: the single-frame passthrough path, the
//! ISO 15765-2 (ISO-TP) multi-frame reassembly path including 4-bit
//! sequence-number rollover reconstruction, and the mode/PID stripping
//! applied to the assembled payload of both paths.

use crate::ecu::EcuRole;
use crate::frame::{Frame, FrameType};

/// Response mode byte for stored DTCs (service `03`/mode `0x43`), which
/// uses a DTC-count length code instead of a fixed PID-response shape.
const MODE_STORED_DTC: u8 = 0x43;

/// One fully assembled OBD response (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// The frames that were combined to produce this message. Exclusively
    /// owned — no shared references back into the input batch (spec.md §9,
    /// "Cyclic references").
    pub frames: Vec<Frame>,
    /// ECU role tag. `UNKNOWN` until [`crate::ecu::EcuMap::lookup`] retags it.
    pub ecu: EcuRole,
    /// Assembled payload with PCI and mode/PID bytes stripped.
    pub data: Vec<u8>,
}

impl Message {
    /// The transmitting ECU's raw id, or `None` for a message with no
    /// frames (never produced by [`assemble`], but meaningful for the
    /// adapter-status messages `crate::driver` builds directly).
    pub fn tx_id(&self) -> Option<u8> {
        self.frames.first().map(|f| f.tx_id)
    }

    /// True iff this message carries assembled data, i.e. it isn't adapter
    /// chatter or a dropped/empty response.
    pub fn parsed(&self) -> bool {
        !self.data.is_empty()
    }

    /// Builds a message carrying an adapter status line verbatim (spec.md
    /// §4.4 step 1, §7 "Adapter-level (informational)"). Always `UNKNOWN`
    /// and always unparsed.
    pub fn adapter_status(raw_line: &str) -> Message {
        Message {
            frames: vec![Frame {
                raw: raw_line.to_string(),
                ..Frame::default()
            }],
            ecu: EcuRole::UNKNOWN,
            data: Vec::new(),
        }
    }
}

/// Assembles one group of same-tx_id frames into a [`Message`], per
/// spec.md §4.2. Returns `None` (and logs at debug level) if the group is
/// malformed: a lone frame that isn't SF, a multi-frame group missing
/// exactly one FF, no CFs at all, or a non-contiguous CF sequence.
pub fn assemble(frames: Vec<Frame>) -> Option<Message> {
    let mut data = if frames.len() == 1 {
        assemble_single(&frames[0])?
    } else {
        assemble_multi(&frames)?
    };

    strip_mode_pid(&mut data);

    Some(Message {
        frames,
        ecu: EcuRole::UNKNOWN,
        data,
    })
}

fn assemble_single(frame: &Frame) -> Option<Vec<u8>> {
    if frame.frame_type != FrameType::Sf {
        log::debug!("Received lone frame not marked as single frame");
        return None;
    }
    let len = frame.data_len as usize;
    let available = frame.data.len().saturating_sub(1);
    let take = len.min(available);
    Some(frame.data[1..1 + take].to_vec())
}

fn assemble_multi(frames: &[Frame]) -> Option<Vec<u8>> {
    let mut ff: Vec<&Frame> = Vec::new();
    let mut cf: Vec<&Frame> = Vec::new();

    for f in frames {
        match f.frame_type {
            FrameType::Ff => ff.push(f),
            FrameType::Cf => cf.push(f),
            FrameType::Sf => {
                log::debug!("Dropping frame in multi-frame response not marked as FF or CF");
            }
        }
    }

    if ff.len() > 1 {
        log::debug!("Received multiple frames marked FF");
        return None;
    }
    let Some(ff) = ff.first().copied() else {
        log::debug!("Never received frame marked FF");
        return None;
    };
    if cf.is_empty() {
        log::debug!("Never received frame marked CF");
        return None;
    }

    // Reconstruct the full sequence number of each CF from its 4-bit raw
    // index and the previous frame's (already-reconstructed) index,
    // detecting rollover (spec.md §4.2 step 3).
    let mut reconstructed: Vec<(u16, &Frame)> = Vec::with_capacity(cf.len());
    reconstructed.push((cf[0].seq_index as u16, cf[0]));
    for window in cf.windows(2) {
        let prev_seq = reconstructed.last().unwrap().0;
        let curr = window[1];
        let mut seq = (prev_seq & !0x0F) | (curr.seq_index as u16 & 0x0F);
        if (seq as i32) < prev_seq as i32 - 7 {
            seq += 0x10;
        }
        reconstructed.push((seq, curr));
    }

    reconstructed.sort_by_key(|(seq, _)| *seq);

    let contiguous = reconstructed
        .iter()
        .enumerate()
        .all(|(i, (seq, _))| *seq == (i as u16) + 1);
    if !contiguous {
        log::debug!("Received multiline response with missing frames");
        return None;
    }

    // First frame: skip its 2-byte PCI (type nibble + length).
    let mut data = ff.data[2..].to_vec();
    // Consecutive frames: skip their 1-byte PCI (type nibble + seq index).
    for (_, frame) in &reconstructed {
        data.extend_from_slice(&frame.data[1..]);
    }

    let declared_len = (ff.data_len as usize).min(data.len());
    data.truncate(declared_len);
    Some(data)
}

/// Strips the mode/PID header from an assembled payload (spec.md §4.2,
/// "Mode/PID stripping"). Stored-DTC responses (mode `0x43`) use the DTC
/// count as a length code instead of the usual fixed 2-byte header; this
/// branch is marked untested upstream (no integration test data was ever
/// captured for it) but the behavior is preserved per spec.md §9.
fn strip_mode_pid(data: &mut Vec<u8>) {
    let Some(&mode) = data.first() else {
        return;
    };
    if mode == MODE_STORED_DTC {
        let num_dtc_bytes = data.get(1).copied().unwrap_or(0) as usize * 2;
        let rest = &data[2.min(data.len())..];
        let take = num_dtc_bytes.min(rest.len());
        *data = rest[..take].to_vec();
    } else {
        let skip = 2.min(data.len());
        *data = data[skip..].to_vec();
    }
}
