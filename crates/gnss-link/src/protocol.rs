//! Wire Protocol Classification

use serde::{Deserialize, Serialize};

/// Sentence-start marker of the text protocol
pub const SENTENCE_START: u8 = b'$';

/// Two-byte sync sequence opening a binary (UBX) frame
pub const UBX_SYNC: [u8; 2] = [0xB5, 0x62];

/// Wire protocol observed on the receiver link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireProtocol {
    /// Nothing recognizable observed within the probe windows
    Unknown,
    /// Textual NMEA 0183 sentences
    Nmea,
    /// Binary u-blox UBX frames (detected, never decoded)
    Ubx,
}

impl WireProtocol {
    /// Whether the stream carries decodable text sentences
    pub fn is_text(&self) -> bool {
        matches!(self, WireProtocol::Nmea)
    }

    /// Whether the stream is binary-framed
    pub fn is_binary(&self) -> bool {
        matches!(self, WireProtocol::Ubx)
    }
}

impl Default for WireProtocol {
    fn default() -> Self {
        WireProtocol::Unknown
    }
}
