//! ECU role tagging and the transmitter-id -> role map
//!
//! An [`EcuMap`] is built once, from the parsed response to the `0100`
//! query, and is read-only for the rest of a [`crate::driver::ProtocolDriver`]'s
//! lifetime (see [`crate::driver`]).

use std::collections::HashMap;

use bitflags::bitflags;

use crate::message::Message;

bitflags! {
    /// Role flags used to tag and filter [`Message`]s by transmitting ECU.
    ///
    /// Each concrete role owns its own bit so callers can build OR-filters
    /// (e.g. "accept anything from the engine or transmission ECU").
    /// [`EcuRole::ALL`] and [`EcuRole::ALL_KNOWN`] are composite filters,
    /// not roles any message is ever tagged with.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EcuRole: u8 {
        /// Transmitter could not be identified as a known role.
        const UNKNOWN = 0b0000_0001;
        /// The engine control unit.
        const ENGINE = 0b0000_0010;
        /// The transmission control unit.
        const TRANSMISSION = 0b0000_0100;
        /// Matches a message from any ECU, known or not.
        const ALL = 0b1111_1111;
        /// Matches a message from any *known* ECU (excludes [`EcuRole::UNKNOWN`]).
        const ALL_KNOWN = 0b1111_1110;
    }
}

impl Default for EcuRole {
    fn default() -> Self {
        EcuRole::UNKNOWN
    }
}

/// A write-once map from raw transmitter id to [`EcuRole`].
///
/// Populated by [`EcuMap::populate`] during [`crate::driver::ProtocolDriver`]
/// construction; never mutated again. Readers require no synchronization
/// since the map is immutable after construction (see spec.md §5, §9).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EcuMap {
    roles: HashMap<u8, EcuRole>,
}

impl EcuMap {
    /// Returns an empty map (no `0100` responders seen yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the role tagged to `tx_id`, defaulting to [`EcuRole::UNKNOWN`]
    /// for any id the map has never seen.
    pub fn lookup(&self, tx_id: u8) -> EcuRole {
        self.roles.get(&tx_id).copied().unwrap_or(EcuRole::UNKNOWN)
    }

    /// Populates the map from the messages produced by parsing the `0100`
    /// response, per spec.md §4.3:
    ///
    /// 1. Discard messages with empty data (adapter chatter).
    /// 2. If none remain, leave the map empty.
    /// 3. If exactly one remains, its tx_id is unconditionally the engine.
    /// 4. Otherwise, any tx_id exactly matching `expected_engine_tx_id` is
    ///    the engine.
    /// 5. If no exact match was found, the message with the greatest total
    ///    population count across its data bytes ("supports the most PIDs")
    ///    is tagged as the engine. Ties are broken by first-seen order.
    /// 6. Every other tx_id seen is tagged [`EcuRole::UNKNOWN`].
    pub fn populate(&mut self, messages: &[Message], expected_engine_tx_id: Option<u8>) {
        let parsed: Vec<&Message> = messages.iter().filter(|m| m.parsed()).collect();

        if parsed.is_empty() {
            log::debug!("0100 response carried no parsed messages; ECU map left empty");
            return;
        }

        if parsed.len() == 1 {
            let tx_id = parsed[0].tx_id().expect("parsed message always has a frame");
            log::debug!("single 0100 responder 0x{tx_id:02X}; tagging as ENGINE unconditionally");
            self.roles.insert(tx_id, EcuRole::ENGINE);
            return;
        }

        let mut found_engine = false;
        if let Some(expected) = expected_engine_tx_id {
            for m in &parsed {
                let tx_id = m.tx_id().expect("parsed message always has a frame");
                if tx_id == expected {
                    log::debug!("0100 responder 0x{tx_id:02X} matches expected engine tx_id");
                    self.roles.insert(tx_id, EcuRole::ENGINE);
                    found_engine = true;
                }
            }
        }

        if !found_engine {
            let mut best_bits = 0u32;
            let mut best_tx_id = None;
            for m in &parsed {
                let bits: u32 = m.data.iter().map(|b| b.count_ones()).sum();
                if bits > best_bits {
                    best_bits = bits;
                    best_tx_id = m.tx_id();
                }
            }
            if let Some(tx_id) = best_tx_id {
                log::debug!(
                    "no exact engine tx_id match; tagging 0x{tx_id:02X} as ENGINE by PID popcount ({best_bits} bits)"
                );
                self.roles.insert(tx_id, EcuRole::ENGINE);
            }
        }

        for m in &parsed {
            let tx_id = m.tx_id().expect("parsed message always has a frame");
            self.roles.entry(tx_id).or_insert(EcuRole::UNKNOWN);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;

    fn msg(tx_id: u8, data: &[u8]) -> Message {
        let mut frame = Frame::default();
        frame.tx_id = tx_id;
        Message {
            frames: vec![frame],
            ecu: EcuRole::UNKNOWN,
            data: data.to_vec(),
        }
    }

    #[test]
    fn lookup_defaults_to_unknown() {
        let map = EcuMap::new();
        assert_eq!(map.lookup(0xAB), EcuRole::UNKNOWN);
    }

    #[test]
    fn empty_messages_leave_map_empty() {
        let mut map = EcuMap::new();
        map.populate(&[msg(0x10, &[])], None);
        assert_eq!(map.lookup(0x10), EcuRole::UNKNOWN);
    }

    #[test]
    fn sole_responder_is_engine_regardless_of_sentinel() {
        let mut map = EcuMap::new();
        map.populate(&[msg(0x10, &[0xBE])], Some(0xFF));
        assert_eq!(map.lookup(0x10), EcuRole::ENGINE);
    }

    #[test]
    fn exact_match_wins_over_popcount() {
        let mut map = EcuMap::new();
        map.populate(
            &[msg(0x00, &[0x01]), msg(0xE8, &[0xFF, 0xFF])],
            Some(0x00),
        );
        assert_eq!(map.lookup(0x00), EcuRole::ENGINE);
        assert_eq!(map.lookup(0xE8), EcuRole::UNKNOWN);
    }

    #[test]
    fn popcount_fallback_picks_most_supported_pids() {
        // S6 from spec.md
        let mut map = EcuMap::new();
        map.populate(
            &[
                msg(0xE8, &[0xBE, 0x3F, 0xA8, 0x13]),
                msg(0xEA, &[0x80, 0x00, 0x00, 0x00]),
            ],
            Some(0),
        );
        assert_eq!(map.lookup(0xE8), EcuRole::ENGINE);
        assert_eq!(map.lookup(0xEA), EcuRole::UNKNOWN);
    }

    #[test]
    fn popcount_ties_break_first_seen() {
        let mut map = EcuMap::new();
        map.populate(&[msg(0x10, &[0x0F]), msg(0x11, &[0x0F])], Some(0xFF));
        assert_eq!(map.lookup(0x10), EcuRole::ENGINE);
        assert_eq!(map.lookup(0x11), EcuRole::UNKNOWN);
    }

    #[test]
    fn all_known_excludes_unknown_and_union_is_all() {
        assert!((EcuRole::ALL_KNOWN & EcuRole::UNKNOWN).is_empty());
        assert_eq!(EcuRole::ALL_KNOWN | EcuRole::UNKNOWN, EcuRole::ALL);
    }
}
