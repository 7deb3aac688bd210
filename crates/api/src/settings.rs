//! Runtime Configuration
//!
//! Defaults live in code; an optional `config/default.toml` overrides
//! them, and environment variables override both (prefix `GNSS_MONITOR`,
//! nested keys joined with `__`, e.g. `GNSS_MONITOR__SERIAL__DEVICE`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Serial link and probe settings
#[derive(Debug, Clone, Deserialize)]
pub struct SerialSettings {
    /// Serial device path
    pub device: String,
    /// Candidate baud rates, probed in order
    pub candidate_bauds: Vec<u32>,
    /// Rate adopted when the probe finds nothing
    pub fallback_baud: u32,
    /// Probe listen window per candidate, in milliseconds
    pub probe_window_ms: u64,
}

/// Publishing settings
#[derive(Debug, Clone, Deserialize)]
pub struct PublishSettings {
    /// Status publish cadence in milliseconds
    pub interval_ms: u32,
    /// Forward raw sentence lines alongside status messages
    pub forward_sentences: bool,
    /// Maximum accepted sentence length, terminator included
    pub line_max: usize,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Bind address, e.g. "0.0.0.0:8080"
    pub bind: String,
}

/// Complete runtime configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub serial: SerialSettings,
    pub publish: PublishSettings,
    pub server: ServerSettings,
}

impl Settings {
    /// Load configuration from defaults, optional file, and environment
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("serial.device", "/dev/ttyUSB0")?
            .set_default("serial.candidate_bauds", vec![9_600_i64, 38_400, 115_200])?
            .set_default("serial.fallback_baud", 9_600_i64)?
            .set_default("serial.probe_window_ms", 500_i64)?
            .set_default("publish.interval_ms", 500_i64)?
            .set_default("publish.forward_sentences", true)?
            .set_default("publish.line_max", 128_i64)?
            .set_default("server.bind", "0.0.0.0:8080")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                Environment::with_prefix("GNSS_MONITOR")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_section() {
        let settings = Settings::load().unwrap();
        assert_eq!(settings.serial.device, "/dev/ttyUSB0");
        assert_eq!(settings.serial.candidate_bauds, vec![9_600, 38_400, 115_200]);
        assert_eq!(settings.serial.fallback_baud, 9_600);
        assert_eq!(settings.publish.interval_ms, 500);
        assert!(settings.publish.forward_sentences);
        assert_eq!(settings.publish.line_max, 128);
        assert_eq!(settings.server.bind, "0.0.0.0:8080");
    }
}
