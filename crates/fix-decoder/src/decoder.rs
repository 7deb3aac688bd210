//! NMEA-Backed Fix Source
//!
//! Glue over the `nmea` crate's streaming parser. The parser accumulates
//! positioning state sentence-by-sentence; this wrapper frames raw bytes
//! into lines, hands them over, and tracks when the position was last
//! updated. Bytes that never form a valid sentence (noise, wrong baud,
//! binary UBX frames) simply never produce validity.

use crate::snapshot::UtcTime;
use crate::source::FixSource;
use chrono::Timelike;
use gnss_link::{MonotonicClock, SentenceAccumulator, DEFAULT_LINE_MAX, SENTENCE_START};
use nmea::sentences::FixType;
use nmea::{Nmea, SentenceType};
use tracing::{debug, trace};

/// Streaming fix decoder over NMEA sentences
pub struct NmeaFixSource<C: MonotonicClock> {
    clock: C,
    parser: Nmea,
    accumulator: SentenceAccumulator,
    /// Clock tick of the last accepted position update
    last_fix_ms: Option<u32>,
    fix_updated: bool,
}

impl<C: MonotonicClock> NmeaFixSource<C> {
    /// Create a decoder reading fix age off the given clock
    pub fn new(clock: C) -> Self {
        Self::with_line_max(clock, DEFAULT_LINE_MAX)
    }

    /// Create a decoder accepting sentences up to `line_max` bytes,
    /// terminator included
    pub fn with_line_max(clock: C, line_max: usize) -> Self {
        Self {
            clock,
            parser: Nmea::default(),
            accumulator: SentenceAccumulator::new(line_max),
            last_fix_ms: None,
            fix_updated: false,
        }
    }

    /// Hand one completed line to the sentence parser
    fn handle_line(&mut self, line: &[u8]) {
        let Ok(text) = std::str::from_utf8(line) else {
            trace!("Skipping non-UTF-8 line");
            return;
        };
        let sentence = text.trim_end_matches(['\r', '\n']);
        if sentence.is_empty() || sentence.as_bytes()[0] != SENTENCE_START {
            return;
        }
        match self.parser.parse(sentence) {
            Ok(kind) => {
                if position_bearing(kind) && self.has_fix() {
                    self.last_fix_ms = Some(self.clock.now_ms());
                    self.fix_updated = true;
                }
            }
            Err(e) => debug!("Unparseable sentence: {:?}", e),
        }
    }
}

/// Whether a sentence type carries a position
fn position_bearing(kind: SentenceType) -> bool {
    matches!(
        kind,
        SentenceType::GGA | SentenceType::RMC | SentenceType::GLL
    )
}

impl<C: MonotonicClock> FixSource for NmeaFixSource<C> {
    fn feed(&mut self, byte: u8) {
        if let Some(line) = self.accumulator.feed(byte) {
            self.handle_line(&line);
        }
    }

    fn has_fix(&self) -> bool {
        let invalid = matches!(self.parser.fix_type, Some(FixType::Invalid));
        !invalid && self.parser.latitude.is_some() && self.parser.longitude.is_some()
    }

    fn location(&self) -> Option<(f64, f64)> {
        match (self.parser.latitude, self.parser.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    fn fix_age_ms(&self) -> Option<u32> {
        self.last_fix_ms
            .map(|t| self.clock.now_ms().wrapping_sub(t))
    }

    fn satellites(&self) -> Option<u32> {
        self.parser.num_of_fix_satellites
    }

    fn hdop(&self) -> Option<f32> {
        self.parser.hdop
    }

    fn utc_time(&self) -> Option<UtcTime> {
        self.parser.fix_time.map(|t| UtcTime {
            hour: t.hour() as u8,
            min: t.minute() as u8,
            sec: t.second() as u8,
        })
    }

    fn take_fix_update(&mut self) -> bool {
        std::mem::replace(&mut self.fix_updated, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gnss_link::MockClock;

    const GGA: &[u8] = b"$GPGGA,092750.000,5321.6802,N,00630.3372,W,1,8,1.03,61.7,M,55.2,M,,*76\r\n";

    fn feed_all(source: &mut NmeaFixSource<MockClock>, bytes: &[u8]) {
        for &b in bytes {
            source.feed(b);
        }
    }

    #[test]
    fn test_fresh_source_reports_nothing() {
        let source = NmeaFixSource::new(MockClock::new());
        assert!(!source.has_fix());
        assert_eq!(source.location(), None);
        assert_eq!(source.fix_age_ms(), None);
        assert_eq!(source.snapshot(), crate::FixSnapshot::empty());
    }

    #[test]
    fn test_gga_sentence_yields_fix() {
        let mut source = NmeaFixSource::new(MockClock::new());
        feed_all(&mut source, GGA);
        assert!(source.has_fix());
        let (lat, lon) = source.location().unwrap();
        assert!((lat - 53.361337).abs() < 1e-4);
        assert!((lon - -6.50562).abs() < 1e-4);
        assert_eq!(source.satellites(), Some(8));
        assert!((source.hdop().unwrap() - 1.03).abs() < 1e-3);
        let utc = source.utc_time().unwrap();
        assert_eq!((utc.hour, utc.min, utc.sec), (9, 27, 50));
    }

    #[test]
    fn test_fix_age_follows_the_clock() {
        let clock = MockClock::new();
        clock.set(1_000);
        let mut source = NmeaFixSource::new(clock.clone());
        feed_all(&mut source, GGA);
        assert_eq!(source.fix_age_ms(), Some(0));
        clock.advance(250);
        assert_eq!(source.fix_age_ms(), Some(250));
    }

    #[test]
    fn test_update_flag_is_edge_triggered() {
        let mut source = NmeaFixSource::new(MockClock::new());
        assert!(!source.take_fix_update());
        feed_all(&mut source, GGA);
        assert!(source.take_fix_update());
        assert!(!source.take_fix_update());
    }

    #[test]
    fn test_corrupt_checksum_is_ignored() {
        let mut source = NmeaFixSource::new(MockClock::new());
        feed_all(
            &mut source,
            b"$GPGGA,092750.000,5321.6802,N,00630.3372,W,1,8,1.03,61.7,M,55.2,M,,*00\r\n",
        );
        assert!(!source.has_fix());
        assert!(!source.take_fix_update());
    }

    #[test]
    fn test_binary_noise_never_validates() {
        let mut source = NmeaFixSource::new(MockClock::new());
        feed_all(&mut source, &[0xB5, 0x62, 0x01, 0x07, 0xFF, 0x00, b'\n']);
        feed_all(&mut source, &[0xB5, 0x62, 0x13, 0x37, b'\n']);
        assert!(!source.has_fix());
        assert_eq!(source.snapshot(), crate::FixSnapshot::empty());
    }

    #[test]
    fn test_snapshot_carries_decoded_fields() {
        let clock = MockClock::new();
        let mut source = NmeaFixSource::new(clock.clone());
        feed_all(&mut source, GGA);
        clock.advance(120);
        let snapshot = source.snapshot();
        assert!(snapshot.has_fix);
        assert_eq!(snapshot.age_ms, Some(120));
        assert_eq!(snapshot.sats, 8);
        assert_eq!(snapshot.utc_hour, Some(9));
    }
}
