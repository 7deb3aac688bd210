//! Fix Decoding
//!
//! Turns framed NMEA sentences into typed, validity-tagged positioning
//! fields. Sentence grammar itself is delegated to the `nmea` crate; this
//! crate owns the capability seam (`FixSource`) the rest of the system is
//! written against, and the snapshot type observers ultimately see.

mod decoder;
mod snapshot;
mod source;

pub use decoder::NmeaFixSource;
pub use snapshot::{FixSnapshot, UtcTime};
pub use source::FixSource;
