//! The protocol driver — orchestrates decode, group, assemble, and tag
//!
//! Implements spec.md §4.4. [`ProtocolDriver`] is constructed once from the
//! raw `0100` response (to populate its [`EcuMap`]) and is then called
//! repeatedly, synchronously, with no I/O and no shared mutable state
//! beyond that write-once map (spec.md §5).

use crate::ecu::EcuMap;
use crate::error::ProtocolError;
use crate::frame::{decode_frame, is_hex};
use crate::message::{assemble, Message};
use crate::protocol::{IdBits, Protocol};

/// Pure, synchronous OBD-II line-batch parser for one CAN-family protocol
/// session.
///
/// All state is confined to the ECU map populated at construction; `call`
/// takes `&self` and allocates only within the returned batch (spec.md §5,
/// §9).
#[derive(Debug, Clone)]
pub struct ProtocolDriver {
    protocol: Protocol,
    id_bits: IdBits,
    ecu_map: EcuMap,
}

impl ProtocolDriver {
    /// Constructs a driver for `protocol`, using `lines_0100` — the raw
    /// adapter response to the `0100` ("supported PIDs 01-20") query — to
    /// populate the ECU map (spec.md §4.3, §4.4 "Construction").
    ///
    /// Fails only if `protocol` is a [`crate::protocol::LegacyProtocol`]
    /// this crate has no CAN-family frame decoder for (spec.md §9).
    pub fn new(protocol: Protocol, lines_0100: &[String]) -> Result<Self, ProtocolError> {
        let id_bits = match protocol {
            Protocol::Can { id_bits, .. } => id_bits,
            Protocol::Legacy(legacy) => return Err(ProtocolError::Unsupported(legacy)),
        };

        let mut driver = ProtocolDriver {
            protocol,
            id_bits,
            ecu_map: EcuMap::new(),
        };

        let (parsed, _adapter) = driver.run_pipeline(lines_0100);
        // The CAN family's TX_ID_ENGINE sentinel (`0`) never denotes a real
        // responder id; modeled as `None` per spec.md §9 ("prefer an
        // explicit optional") rather than confusing it with tx_id 0x00.
        driver.ecu_map.populate(&parsed, None);
        Ok(driver)
    }

    /// The protocol this driver was constructed for.
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Parses one batch of raw adapter lines into messages (spec.md §4.4).
    ///
    /// Returns parsed messages (in tx_id first-seen order) followed by
    /// preserved adapter-status messages (in input order). Never fails —
    /// an empty result with a non-empty adapter-status tail is a valid,
    /// meaningful outcome (spec.md §7).
    pub fn call(&self, lines: &[String]) -> Vec<Message> {
        let (mut parsed, adapter) = self.run_pipeline(lines);
        for msg in &mut parsed {
            let tx_id = msg.tx_id().expect("assembled messages always carry a frame");
            msg.ecu = self.ecu_map.lookup(tx_id);
        }
        parsed.extend(adapter);
        parsed
    }

    /// Classify, decode, group, and assemble — shared by [`ProtocolDriver::new`]
    /// (where ECU tagging is skipped) and [`ProtocolDriver::call`].
    fn run_pipeline(&self, lines: &[String]) -> (Vec<Message>, Vec<Message>) {
        let mut adapter_messages = Vec::new();
        let mut frames_by_tx: Vec<(u8, Vec<crate::frame::Frame>)> = Vec::new();

        for line in lines {
            if !is_hex(line) {
                log::debug!("Preserving non-hex adapter line: {line}");
                adapter_messages.push(Message::adapter_status(line));
                continue;
            }
            let Some(frame) = decode_frame(line, self.id_bits) else {
                continue;
            };
            match frames_by_tx.iter_mut().find(|(tx, _)| *tx == frame.tx_id) {
                Some((_, frames)) => frames.push(frame),
                None => frames_by_tx.push((frame.tx_id, vec![frame])),
            }
        }

        let messages = frames_by_tx
            .into_iter()
            .filter_map(|(_, frames)| assemble(frames))
            .collect();

        (messages, adapter_messages)
    }
}
