//! Startup Baud and Protocol Probe
//!
//! Receivers ship with any of a handful of factory baud rates and may be
//! configured for text (NMEA) or binary (UBX) output. The probe listens
//! briefly at each candidate rate and classifies the stream from what it
//! sees. "Nothing found" is a normal outcome, not an error: the link is
//! left open at a fallback rate so the system can keep running.

use crate::link::UartLink;
use crate::protocol::{WireProtocol, SENTENCE_START, UBX_SYNC};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Configuration for the startup probe
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Candidate baud rates, tried in order; earlier entries win ties
    pub candidate_bauds: Vec<u32>,
    /// Listen window per candidate
    pub window: Duration,
    /// Secondary wait for the second UBX sync byte
    pub sync_wait: Duration,
    /// Rate adopted when no candidate matches
    pub fallback_baud: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            candidate_bauds: vec![9_600, 38_400, 115_200],
            window: Duration::from_millis(500),
            sync_wait: Duration::from_millis(50),
            fallback_baud: 9_600,
        }
    }
}

/// Outcome of the startup probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// Baud rate the link was left open at
    pub baud: u32,
    /// Observed wire protocol
    pub protocol: WireProtocol,
}

/// One-shot startup probe over the receiver link
pub struct ProtocolProbe {
    config: ProbeConfig,
}

impl ProtocolProbe {
    /// Create a probe with the given configuration
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// Try each candidate rate in order and classify the byte stream
    ///
    /// Never fails: when nothing is recognized within any window, the link
    /// is reopened at the fallback rate and the outcome carries
    /// `WireProtocol::Unknown`. The link is left open at the returned rate
    /// in every case, ready for continuous reading.
    pub async fn detect<L: UartLink>(&self, link: &mut L) -> ProbeOutcome {
        for &baud in &self.config.candidate_bauds {
            debug!("Probing {} baud", baud);
            if let Err(e) = link.reopen(baud).await {
                warn!("Could not open link at {} baud: {}", baud, e);
                continue;
            }
            if let Some(protocol) = self.scan_window(link).await {
                info!("Detected {:?} at {} baud", protocol, baud);
                return ProbeOutcome { baud, protocol };
            }
        }

        warn!(
            "No protocol detected; falling back to {} baud",
            self.config.fallback_baud
        );
        if let Err(e) = link.reopen(self.config.fallback_baud).await {
            warn!("Could not reopen link at fallback rate: {}", e);
        }
        ProbeOutcome {
            baud: self.config.fallback_baud,
            protocol: WireProtocol::Unknown,
        }
    }

    /// Scan one candidate's window for a recognizable marker
    ///
    /// `$` classifies the stream as NMEA. A 0xB5 byte gets a short grace
    /// period for the 0x62 that would complete the UBX sync pair; whatever
    /// else arrives in its place is reconsidered as a fresh byte, since it
    /// may itself start a match.
    async fn scan_window<L: UartLink>(&self, link: &mut L) -> Option<WireProtocol> {
        let deadline = Instant::now() + self.config.window;
        let mut buf = [0u8; 1];
        loop {
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            match link.read(&mut buf, deadline - now).await {
                Ok(0) => continue,
                Ok(_) => {}
                Err(e) => {
                    debug!("Read failed during probe window: {}", e);
                    return None;
                }
            }
            let mut byte = buf[0];
            loop {
                if byte == SENTENCE_START {
                    return Some(WireProtocol::Nmea);
                }
                if byte != UBX_SYNC[0] {
                    break;
                }
                match link.read(&mut buf, self.config.sync_wait).await {
                    Ok(n) if n > 0 && buf[0] == UBX_SYNC[1] => return Some(WireProtocol::Ubx),
                    Ok(n) if n > 0 => {
                        byte = buf[0];
                    }
                    _ => break,
                }
            }
        }
    }
}
