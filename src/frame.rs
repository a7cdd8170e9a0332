//! Frame decoding — turns one ASCII-hex adapter line into a [`Frame`]
//!
//! Implements spec.md §4.1: normalizing 11-bit CAN headers to the same
//! 4-byte-header layout 29-bit headers already use, decoding priority /
//! addressing-mode / tx-rx identifiers, and classifying the Protocol
//! Control Information (PCI) byte into single/first/consecutive frame
//! types.

use crate::protocol::IdBits;

/// PCI nibble for a single frame (payload fits in one CAN frame).
pub const FRAME_TYPE_SF: u8 = 0x00;
/// PCI nibble for the first frame of a multi-frame (ISO-TP) message.
pub const FRAME_TYPE_FF: u8 = 0x10;
/// PCI nibble for a consecutive frame of a multi-frame message.
pub const FRAME_TYPE_CF: u8 = 0x20;

/// Tester (scan tool) synthetic tx/rx id, stable across 11-bit and 29-bit
/// addressing.
pub const TESTER_ID: u8 = 0xF1;
/// 29-bit functional (broadcast) receiver id.
pub const BROADCAST_RX_ID_29BIT: u8 = 0x33;

/// Protocol Control Information frame category (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameType {
    /// Single frame: the whole payload fits in this one frame.
    #[default]
    Sf,
    /// First frame of a multi-frame (ISO-TP) message.
    Ff,
    /// Consecutive frame of a multi-frame message.
    Cf,
}

impl FrameType {
    fn from_pci_nibble(nibble: u8) -> Option<Self> {
        match nibble {
            FRAME_TYPE_SF => Some(FrameType::Sf),
            FRAME_TYPE_FF => Some(FrameType::Ff),
            FRAME_TYPE_CF => Some(FrameType::Cf),
            _ => None,
        }
    }
}

/// One parsed line of OBD-II adapter output (spec.md §3).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    /// The original line, space-stripped and uppercased, kept for
    /// diagnostics (and for surfacing adapter status lines verbatim).
    pub raw: String,
    /// Leading priority byte (29-bit) or its low nibble (11-bit, always 7).
    pub priority: u8,
    /// Addressing-mode byte distinguishing functional from physical
    /// addressing.
    pub addr_mode: u8,
    /// Synthesized transmitter id.
    pub tx_id: u8,
    /// Synthesized receiver id.
    pub rx_id: u8,
    /// PCI frame category.
    pub frame_type: FrameType,
    /// 4-bit sequence number; only meaningful when `frame_type == Cf`.
    pub seq_index: u8,
    /// Declared payload length: 4 bits for SF, 12 bits for FF, unset (0)
    /// for CF.
    pub data_len: u16,
    /// Bytes following the normalized 4-byte header; `data[0]` is the PCI
    /// byte.
    pub data: Vec<u8>,
}

/// Parses one already hex-classified line into a [`Frame`].
///
/// Returns `None` if the line cannot be decoded as a well-formed CAN
/// frame: malformed hex, a too-short header/payload, or an unrecognized
/// PCI type. Per spec.md §4.1/§7 this is never a hard error — the caller
/// (`crate::driver::ProtocolDriver`) logs and drops the frame.
pub fn decode_frame(line: &str, id_bits: IdBits) -> Option<Frame> {
    let no_spaces: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    let upper = no_spaces.to_uppercase();

    let padded = match id_bits {
        // 11-bit headers arrive as 3 header nibbles; left-pad with five
        // zero nibbles so every frame has a uniform 4-byte header.
        IdBits::Bits11 => format!("00000{upper}"),
        IdBits::Bits29 => upper.clone(),
    };

    let raw_bytes = hex_to_bytes(&padded)?;
    if raw_bytes.len() < 5 {
        log::debug!("Dropping frame shorter than header+PCI: {upper}");
        return None;
    }

    let (priority, addr_mode, tx_id, rx_id) = match id_bits {
        IdBits::Bits11 => {
            let priority = raw_bytes[2] & 0x0F;
            let addr_mode = raw_bytes[3] & 0xF0;
            let (tx_id, rx_id) = if addr_mode == 0xD0 {
                // Functional request from tester.
                (TESTER_ID, raw_bytes[3] & 0x0F)
            } else if raw_bytes[3] & 0x08 != 0 {
                // Response from ECU to tester.
                (raw_bytes[3] & 0x07, TESTER_ID)
            } else {
                // Untested in the source this crate is grounded on; preserved
                // per spec.md §9 Open Questions.
                (TESTER_ID, raw_bytes[3] & 0x07)
            };
            (priority, addr_mode, tx_id, rx_id)
        }
        IdBits::Bits29 => (raw_bytes[0], raw_bytes[1], raw_bytes[3], raw_bytes[2]),
    };

    let data = raw_bytes[4..].to_vec();
    let Some(frame_type) = FrameType::from_pci_nibble(data[0] & 0xF0) else {
        log::debug!("Dropping frame carrying unknown PCI frame type: {upper}");
        return None;
    };

    let (seq_index, data_len) = match frame_type {
        FrameType::Sf => (0, (data[0] & 0x0F) as u16),
        FrameType::Ff => {
            if data.len() < 2 {
                log::debug!("Dropping first frame too short to carry a 12-bit length: {upper}");
                return None;
            }
            (0, (((data[0] & 0x0F) as u16) << 8) | data[1] as u16)
        }
        FrameType::Cf => (data[0] & 0x0F, 0),
    };

    Some(Frame {
        raw: upper,
        priority,
        addr_mode,
        tx_id,
        rx_id,
        frame_type,
        seq_index,
        data_len,
        data,
    })
}

fn hex_to_bytes(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    let mut out = Vec::with_capacity(s.len() / 2);
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let hi = (bytes[i] as char).to_digit(16)?;
        let lo = (bytes[i + 1] as char).to_digit(16)?;
        out.push(((hi << 4) | lo) as u8);
        i += 2;
    }
    Some(out)
}

/// Returns whether every character in `s` is a hex digit, ignoring
/// whitespace — used by [`crate::driver::ProtocolDriver`] to separate
/// valid OBD lines from adapter status text (spec.md §4.4 step 1).
pub fn is_hex(s: &str) -> bool {
    let stripped: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_11bit_single_frame() {
        // S1 from spec.md
        let f = decode_frame("7 E8 04 41 0C 1A F8", IdBits::Bits11).unwrap();
        assert_eq!(f.tx_id, 0);
        assert_eq!(f.rx_id, TESTER_ID);
        assert_eq!(f.priority, 7);
        assert_eq!(f.frame_type, FrameType::Sf);
        assert_eq!(f.data_len, 4);
        assert_eq!(f.data, vec![0x04, 0x41, 0x0C, 0x1A, 0xF8]);
    }

    #[test]
    fn decodes_29bit_single_frame() {
        // S2 from spec.md
        let f = decode_frame("18 DA F1 10 06 41 00 BE 7F B8 13", IdBits::Bits29).unwrap();
        assert_eq!(f.priority, 0x18);
        assert_eq!(f.addr_mode, 0xDA);
        assert_eq!(f.rx_id, TESTER_ID);
        assert_eq!(f.tx_id, 0x10);
        assert_eq!(f.frame_type, FrameType::Sf);
        assert_eq!(f.data_len, 6);
    }

    #[test]
    fn decodes_29bit_first_and_consecutive_frames() {
        let ff = decode_frame(
            "18 DA F1 10 10 14 49 02 01 31 32 33",
            IdBits::Bits29,
        )
        .unwrap();
        assert_eq!(ff.frame_type, FrameType::Ff);
        assert_eq!(ff.data_len, 0x014);

        let cf = decode_frame(
            "18 DA F1 10 21 34 35 36 37 38 39 41",
            IdBits::Bits29,
        )
        .unwrap();
        assert_eq!(cf.frame_type, FrameType::Cf);
        assert_eq!(cf.seq_index, 1);
    }

    #[test]
    fn drops_unknown_pci_type() {
        assert!(decode_frame("18 DA F1 10 36 00 00 00 00 00 00 00", IdBits::Bits29).is_none());
    }

    #[test]
    fn is_hex_ignores_whitespace_but_rejects_letters() {
        assert!(is_hex("7 E8 04 41 0C 1A F8"));
        assert!(!is_hex("NO DATA"));
        assert!(!is_hex(""));
    }

    #[test]
    fn decodes_11bit_functional_request_header() {
        let f = decode_frame("7 DF 02 01 00", IdBits::Bits11).unwrap();
        assert_eq!(f.addr_mode, 0xD0);
        assert_eq!(f.tx_id, TESTER_ID);
        assert_eq!(f.rx_id, 0x0F);
    }
}
