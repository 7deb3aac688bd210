//! GNSS Receiver Link
//!
//! This crate manages the serial side of a GNSS receiver: probing the
//! unknown baud rate and wire protocol at startup, reading the byte
//! stream, and framing it into discrete NMEA sentence lines.

mod error;
mod link;
mod probe;
mod protocol;
mod sentence;
mod time;

pub use error::LinkError;
pub use link::{SerialLink, UartLink};
pub use probe::{ProbeConfig, ProbeOutcome, ProtocolProbe};
pub use protocol::{WireProtocol, SENTENCE_START, UBX_SYNC};
pub use sentence::{SentenceAccumulator, DEFAULT_LINE_MAX};
pub use time::{MockClock, MonotonicClock, SystemClock};
