//! Thin CLI demo: open a serial ELM327 adapter, negotiate automatic
//! protocol detection, and log every decoded message.
//!
//! Not part of the published crate (see `exclude` in `Cargo.toml`) — this
//! is a runnable example of wiring [`obd2_protocol::transport::serial`]
//! to [`obd2_protocol::driver::ProtocolDriver`], in the same spirit as
//! the hardware crate's own `slcan_can` example.

use std::env;
use std::time::Duration;

use obd2_protocol::driver::ProtocolDriver;
use obd2_protocol::protocol::Protocol;
use obd2_protocol::transport::serial::SerialAdapterLink;
use obd2_protocol::transport::AdapterLink;

fn main() {
    env_logger::builder()
        .format_timestamp(Some(env_logger::TimestampPrecision::Millis))
        .init();

    let path = env::args().nth(1).unwrap_or_else(|| "/dev/ttyUSB0".into());

    let mut link = SerialAdapterLink::open(&path, 38400, Duration::from_millis(500))
        .expect("failed to open adapter");
    link.negotiate().expect("adapter negotiation failed");

    let reply = link.write_read("0100").expect("0100 query failed");
    let lines_0100 = vec![reply];

    let driver = ProtocolDriver::new(Protocol::ISO_15765_4_11BIT_500K, &lines_0100)
        .expect("CAN protocol should always be supported");

    loop {
        let line = match link.write_read("0105") {
            Ok(line) => line,
            Err(e) => {
                log::error!("adapter read failed: {e}");
                break;
            }
        };
        for message in driver.call(&[line]) {
            log::info!(
                "{:?} tx={:?}: {:02X?}",
                message.ecu,
                message.tx_id(),
                message.data
            );
        }
    }
}
