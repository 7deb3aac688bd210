//! Decoded Receiver State Snapshots

use serde::{Deserialize, Serialize};

/// UTC time of day as reported by the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtcTime {
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub min: u8,
    /// Second (0-59)
    pub sec: u8,
}

/// Decoded, observable receiver state at a point in time
///
/// Produced fresh on each publish tick and never mutated afterward.
/// Optional fields are omitted from the serialized form when absent:
/// "no fix yet" is normal operating state, not an error, and shows up as
/// absence rather than sentinel values (except `lat`/`lon`/`sats`, which
/// hold 0 by wire contract).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixSnapshot {
    /// Whether the receiver currently reports a valid position fix
    #[serde(rename = "hasFix")]
    pub has_fix: bool,
    /// Latitude in degrees, 0.0 when no fix
    pub lat: f64,
    /// Longitude in degrees, 0.0 when no fix
    pub lon: f64,
    /// Milliseconds since the last position update, present only with a fix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_ms: Option<u32>,
    /// Satellites used in the fix, 0 when unknown
    pub sats: u32,
    /// Horizontal dilution of precision, present only when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hdop: Option<f32>,
    /// UTC hour, present only when the receiver reported time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_hour: Option<u8>,
    /// UTC minute, present only when the receiver reported time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_min: Option<u8>,
    /// UTC second, present only when the receiver reported time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_sec: Option<u8>,
}

impl FixSnapshot {
    /// Snapshot of a receiver that has decoded nothing yet
    pub fn empty() -> Self {
        Self {
            has_fix: false,
            lat: 0.0,
            lon: 0.0,
            age_ms: None,
            sats: 0,
            hdop: None,
            utc_hour: None,
            utc_min: None,
            utc_sec: None,
        }
    }
}

impl Default for FixSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
