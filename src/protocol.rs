//! Protocol identity — which header width and ELM metadata a session uses
//!
//! spec.md models the CAN family as one implementation parameterized by
//! `id_bits` (§4.4, "Protocol variants"), and the Design Notes ask for the
//! sibling legacy protocols (J1850, ISO9141, KWP) to exist as tagged
//! variants of a `Protocol` sum type even though their frame decoders are
//! out of scope here. [`Protocol`] is that sum type.

use std::str::FromStr;

use strum_macros::{Display, EnumString};

/// CAN identifier width. Selects which header-decoding branch of
/// [`crate::frame::decode_frame`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IdBits {
    /// 11-bit CAN identifiers (3 header nibbles on the wire).
    Bits11,
    /// 29-bit CAN identifiers (4 header bytes on the wire).
    Bits29,
}

/// Non-CAN legacy protocols that share the `Protocol` abstraction in the
/// original implementation but whose frame decoders are out of scope for
/// this crate (spec.md §1, "Out of scope"). Exists purely as a tag so the
/// driver can be selected at runtime by ELM protocol number without a
/// panic on a legally-reported-but-unimplemented protocol (spec.md §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum LegacyProtocol {
    /// SAE J1850 PWM (ELM protocol `1`).
    #[strum(serialize = "SAE J1850 PWM")]
    SaeJ1850Pwm,
    /// SAE J1850 VPW (ELM protocol `2`).
    #[strum(serialize = "SAE J1850 VPW")]
    SaeJ1850Vpw,
    /// ISO 9141-2 (ELM protocol `3`).
    #[strum(serialize = "ISO 9141-2")]
    Iso9141_2,
    /// ISO 14230-4 KWP (5 baud init, ELM protocol `4`).
    #[strum(serialize = "ISO 14230-4 (KWP 5BAUD)")]
    Iso14230_5Baud,
    /// ISO 14230-4 KWP (fast init, ELM protocol `5`).
    #[strum(serialize = "ISO 14230-4 (KWP FAST)")]
    Iso14230Fast,
}

/// The set of protocols an ELM327-compatible adapter can report. CAN
/// variants carry the metadata needed to decode their frames; legacy
/// variants carry only identity (spec.md §9, "Polymorphism across
/// protocol variants").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Protocol {
    /// A CAN-family ISO-TP protocol, parameterized by header width.
    Can {
        /// Header width for this session.
        id_bits: IdBits,
        /// ELM327 protocol-number character, e.g. `'6'`.
        elm_id: char,
        /// Human-readable ELM protocol name.
        elm_name: &'static str,
    },
    /// A legacy (non-CAN) protocol with no frame decoder in this crate.
    Legacy(LegacyProtocol),
}

impl Protocol {
    /// ISO 15765-4 (CAN 11/500): ELM protocol `6`.
    pub const ISO_15765_4_11BIT_500K: Protocol = Protocol::Can {
        id_bits: IdBits::Bits11,
        elm_id: '6',
        elm_name: "ISO 15765-4 (CAN 11/500)",
    };
    /// ISO 15765-4 (CAN 29/500): ELM protocol `7`.
    pub const ISO_15765_4_29BIT_500K: Protocol = Protocol::Can {
        id_bits: IdBits::Bits29,
        elm_id: '7',
        elm_name: "ISO 15765-4 (CAN 29/500)",
    };
    /// ISO 15765-4 (CAN 11/250): ELM protocol `8`.
    pub const ISO_15765_4_11BIT_250K: Protocol = Protocol::Can {
        id_bits: IdBits::Bits11,
        elm_id: '8',
        elm_name: "ISO 15765-4 (CAN 11/250)",
    };
    /// ISO 15765-4 (CAN 29/250): ELM protocol `9`.
    pub const ISO_15765_4_29BIT_250K: Protocol = Protocol::Can {
        id_bits: IdBits::Bits29,
        elm_id: '9',
        elm_name: "ISO 15765-4 (CAN 29/250)",
    };
    /// SAE J1939 (CAN 29/250): ELM protocol `A`. A 29-bit variant that
    /// reuses the same frame decoder as the ISO 15765-4 CAN protocols.
    pub const SAE_J1939: Protocol = Protocol::Can {
        id_bits: IdBits::Bits29,
        elm_id: 'A',
        elm_name: "SAE J1939 (CAN 29/250)",
    };

    /// Resolves the protocol an adapter reports via `ATDPN` (the ELM327
    /// "describe protocol number" response), e.g. `"6"` or `"A6"`.
    ///
    /// Returns `None` for an id this crate has never heard of; this is
    /// distinct from [`LegacyProtocol`], which covers known-but-unsupported
    /// protocols.
    pub fn from_elm_id(id: char) -> Option<Protocol> {
        match id {
            '6' => Some(Protocol::ISO_15765_4_11BIT_500K),
            '7' => Some(Protocol::ISO_15765_4_29BIT_500K),
            '8' => Some(Protocol::ISO_15765_4_11BIT_250K),
            '9' => Some(Protocol::ISO_15765_4_29BIT_250K),
            'A' => Some(Protocol::SAE_J1939),
            '1' => Some(Protocol::Legacy(LegacyProtocol::SaeJ1850Pwm)),
            '2' => Some(Protocol::Legacy(LegacyProtocol::SaeJ1850Vpw)),
            '3' => Some(Protocol::Legacy(LegacyProtocol::Iso9141_2)),
            '4' => Some(Protocol::Legacy(LegacyProtocol::Iso14230_5Baud)),
            '5' => Some(Protocol::Legacy(LegacyProtocol::Iso14230Fast)),
            _ => None,
        }
    }

    /// Human-readable ELM protocol name.
    pub fn name(&self) -> String {
        match self {
            Protocol::Can { elm_name, .. } => elm_name.to_string(),
            Protocol::Legacy(lp) => lp.to_string(),
        }
    }
}

impl FromStr for Protocol {
    type Err = crate::error::ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .chars()
            .next()
            .ok_or(crate::error::ProtocolError::UnknownElmId('\0'))?;
        Protocol::from_elm_id(id).ok_or(crate::error::ProtocolError::UnknownElmId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elm_ids_roundtrip_to_known_protocols() {
        assert_eq!(Protocol::from_elm_id('6'), Some(Protocol::ISO_15765_4_11BIT_500K));
        assert_eq!(Protocol::from_elm_id('A'), Some(Protocol::SAE_J1939));
    }

    #[test]
    fn unknown_elm_id_is_none() {
        assert_eq!(Protocol::from_elm_id('Z'), None);
    }

    #[test]
    fn legacy_protocol_is_distinct_from_unknown() {
        assert_eq!(
            Protocol::from_elm_id('3'),
            Some(Protocol::Legacy(LegacyProtocol::Iso9141_2))
        );
    }
}
