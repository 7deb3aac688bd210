//! Fix Source Capability
//!
//! The core is written against this trait rather than any concrete
//! sentence parser: feed it bytes, read back typed fields with per-field
//! validity. Any conforming implementation satisfies the contract.

use crate::snapshot::{FixSnapshot, UtcTime};

/// Streaming positioning decoder with per-field validity
pub trait FixSource {
    /// Advance the decoder by one raw byte from the receiver
    fn feed(&mut self, byte: u8);

    /// Whether a valid position fix is currently held
    fn has_fix(&self) -> bool;

    /// Decoded position as (latitude, longitude) in degrees
    fn location(&self) -> Option<(f64, f64)>;

    /// Milliseconds since the position was last updated
    fn fix_age_ms(&self) -> Option<u32>;

    /// Satellites used in the fix
    fn satellites(&self) -> Option<u32>;

    /// Horizontal dilution of precision
    fn hdop(&self) -> Option<f32>;

    /// UTC time of day as last reported
    fn utc_time(&self) -> Option<UtcTime>;

    /// Edge-trigger flag: true once per position update since the last call
    fn take_fix_update(&mut self) -> bool;

    /// Compose the current field values into an observable snapshot
    fn snapshot(&self) -> FixSnapshot {
        let has_fix = self.has_fix();
        let (lat, lon) = match self.location() {
            Some(position) if has_fix => position,
            _ => (0.0, 0.0),
        };
        let utc = self.utc_time();
        FixSnapshot {
            has_fix,
            lat,
            lon,
            age_ms: if has_fix { self.fix_age_ms() } else { None },
            sats: self.satellites().unwrap_or(0),
            hdop: self.hdop(),
            utc_hour: utc.map(|t| t.hour),
            utc_min: utc.map(|t| t.min),
            utc_sec: utc.map(|t| t.sec),
        }
    }
}
