//! Single-wire UART register protocol.
//!
//! Frame encoding, the transport seam, status decoding and the register engine.

mod engine;
pub mod frame;
mod status;
mod transport;

pub use engine::{ProbeReport, ProtocolResult, TmcUart};
pub use frame::{crc8, encode_read, encode_write, ReadReply};
pub use status::{BusDiagnosis, DriverSnapshot, DriverStatus, GlobalStatus, IoPins};
pub use transport::{IoTransport, SerialTransport};
