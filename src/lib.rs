#![deny(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_imports,
    unused_import_braces,
    unused_qualifications
)]

//! A crate which decodes the ISO 15765-2 (ISO-TP over CAN) transport layer
//! used by OBD-II, as spoken through ELM327-compatible adapters.
//!
//! ## What this crate does
//!
//! Given raw ASCII lines read back from an ELM327-style adapter (hex frame
//! dumps interleaved with adapter status text like `NO DATA` or
//! `STOPPED`), [`driver::ProtocolDriver`] decodes each line into a
//! [`frame::Frame`], groups frames by transmitting ECU, reassembles
//! multi-frame (ISO-TP) responses into [`message::Message`]s, strips the
//! mode/PID header, and tags each message with the [`ecu::EcuRole`] of the
//! ECU that sent it.
//!
//! This is a pure, synchronous, no-I/O parsing core. It does not open
//! serial ports, does not send AT commands, and does not know about the
//! catalog of OBD PIDs or how to decode their values — those are external
//! collaborators. The [`transport`] module supplies one honestly-thin
//! implementation of the adapter-facing side (serial port + AT-command
//! negotiation) for callers who want it; [`commands`] supplies only the
//! single request this crate's own `0100` ECU-discovery step depends on.
//!
//! ## Supported protocols
//!
//! All five ISO 15765-4 / SAE J1939 CAN variants ELM327 adapters report
//! are decoded identically, parameterized only by CAN identifier width
//! (see [`protocol::Protocol`]). The legacy (non-CAN) protocols — SAE
//! J1850 PWM/VPW, ISO 9141-2, ISO 14230-4 KWP — are recognized as tags so
//! callers can detect them without a panic, but this crate has no frame
//! decoder for them; [`driver::ProtocolDriver::new`] refuses to construct
//! a driver for one.
//!
//! ## Example
//!
//! ```no_run
//! use obd2_protocol::driver::ProtocolDriver;
//! use obd2_protocol::protocol::Protocol;
//!
//! # fn get_0100_response() -> Vec<String> { vec![] }
//! # fn get_next_batch() -> Vec<String> { vec![] }
//! let lines_0100 = get_0100_response();
//! let driver = ProtocolDriver::new(Protocol::ISO_15765_4_11BIT_500K, &lines_0100)?;
//!
//! for message in driver.call(&get_next_batch()) {
//!     println!("{:?} from {:?}: {:02X?}", message.ecu, message.tx_id(), message.data);
//! }
//! # Ok::<(), obd2_protocol::error::ProtocolError>(())
//! ```

pub mod commands;
pub mod driver;
pub mod ecu;
pub mod error;
pub mod frame;
pub mod message;
pub mod protocol;
pub mod transport;

pub use driver::ProtocolDriver;
pub use ecu::{EcuMap, EcuRole};
pub use error::ProtocolError;
pub use frame::{Frame, FrameType};
pub use message::Message;
pub use protocol::{IdBits, LegacyProtocol, Protocol};
