//! Status Publisher

use crate::timer::PublishTimer;
use fix_decoder::{FixSnapshot, FixSource};
use serde::Serialize;
use tracing::warn;

/// Periodic snapshot builder over a fix source
pub struct StatusPublisher {
    timer: PublishTimer,
}

impl StatusPublisher {
    /// Create a publisher firing once per `interval_ms`, anchored at `now_ms`
    pub fn new(interval_ms: u32, now_ms: u32) -> Self {
        Self {
            timer: PublishTimer::new(interval_ms, now_ms),
        }
    }

    /// Produce a snapshot when the cadence is due, otherwise nothing
    ///
    /// The cadence is advanced before the snapshot is built, so a failing
    /// build can never wedge the publisher into firing on every call.
    pub fn tick<S: FixSource>(&mut self, now_ms: u32, source: &S) -> Option<FixSnapshot> {
        if !self.timer.is_due(now_ms) {
            return None;
        }
        self.timer.mark_fired(now_ms);
        Some(source.snapshot())
    }

    /// Configured publish interval in milliseconds
    pub fn interval_ms(&self) -> u32 {
        self.timer.interval_ms()
    }
}

/// Status snapshot in its wire envelope
#[derive(Debug, Clone, Serialize)]
pub struct StatusMessage {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    snapshot: FixSnapshot,
}

impl StatusMessage {
    /// Wrap a snapshot for publication
    pub fn new(snapshot: FixSnapshot) -> Self {
        Self {
            kind: "status",
            snapshot,
        }
    }

    /// Serialize to the wire form; `None` (logged) if serialization fails
    pub fn to_wire(&self) -> Option<String> {
        match serde_json::to_string(self) {
            Ok(json) => Some(json),
            Err(e) => {
                warn!("Could not serialize status message: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fix_decoder::UtcTime;

    struct StubSource {
        snapshot: FixSnapshot,
    }

    impl FixSource for StubSource {
        fn feed(&mut self, _byte: u8) {}
        fn has_fix(&self) -> bool {
            self.snapshot.has_fix
        }
        fn location(&self) -> Option<(f64, f64)> {
            self.snapshot
                .has_fix
                .then_some((self.snapshot.lat, self.snapshot.lon))
        }
        fn fix_age_ms(&self) -> Option<u32> {
            self.snapshot.age_ms
        }
        fn satellites(&self) -> Option<u32> {
            Some(self.snapshot.sats)
        }
        fn hdop(&self) -> Option<f32> {
            self.snapshot.hdop
        }
        fn utc_time(&self) -> Option<UtcTime> {
            match (
                self.snapshot.utc_hour,
                self.snapshot.utc_min,
                self.snapshot.utc_sec,
            ) {
                (Some(hour), Some(min), Some(sec)) => Some(UtcTime { hour, min, sec }),
                _ => None,
            }
        }
        fn take_fix_update(&mut self) -> bool {
            false
        }
    }

    fn empty_source() -> StubSource {
        StubSource {
            snapshot: FixSnapshot::empty(),
        }
    }

    #[test]
    fn test_fires_once_per_interval() {
        let mut publisher = StatusPublisher::new(500, 0);
        let source = empty_source();
        assert!(publisher.tick(100, &source).is_none());
        assert!(publisher.tick(500, &source).is_some());
        assert!(publisher.tick(700, &source).is_none());
        assert!(publisher.tick(999, &source).is_none());
        assert!(publisher.tick(1_000, &source).is_some());
    }

    #[test]
    fn test_no_drift_between_fires() {
        let mut publisher = StatusPublisher::new(500, 0);
        let source = empty_source();
        // Fire arrives late; the next one anchors on the late fire time.
        assert!(publisher.tick(510, &source).is_some());
        assert!(publisher.tick(1_009, &source).is_none());
        assert!(publisher.tick(1_010, &source).is_some());
    }

    #[test]
    fn test_snapshot_comes_from_source() {
        let mut publisher = StatusPublisher::new(500, 0);
        let source = StubSource {
            snapshot: FixSnapshot {
                has_fix: true,
                lat: 53.36,
                lon: -6.5,
                age_ms: Some(40),
                sats: 9,
                hdop: Some(1.1),
                utc_hour: Some(9),
                utc_min: Some(27),
                utc_sec: Some(50),
            },
        };
        let snapshot = publisher.tick(500, &source).unwrap();
        assert!(snapshot.has_fix);
        assert_eq!(snapshot.sats, 9);
        assert_eq!(snapshot.age_ms, Some(40));
    }

    #[test]
    fn test_status_message_wire_shape() {
        let wire = StatusMessage::new(FixSnapshot::empty()).to_wire().unwrap();
        let value: serde_json::Value = serde_json::from_str(&wire).unwrap();
        assert_eq!(value["type"], "status");
        assert_eq!(value["hasFix"], false);
        assert_eq!(value["lat"], 0.0);
        assert_eq!(value["sats"], 0);
        assert!(value.get("age_ms").is_none());
        // Observers distinguish status messages from raw sentences by the
        // leading brace.
        assert!(wire.starts_with('{'));
    }
}
