//! GNSS Receiver Monitor - Main Entry Point

use anyhow::{Context, Result};
use api::settings::Settings;
use api::{init_logging, ingest, run_server, AppState, BroadcastTransport};
use fix_decoder::NmeaFixSource;
use gnss_link::{MonotonicClock, ProbeConfig, ProtocolProbe, SerialLink, SystemClock};
use status_publisher::StatusPublisher;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::info;

/// Fan-out channel depth; lagging observers drop messages past this
const BROADCAST_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    info!("=== GNSS Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load().context("loading configuration")?;

    let mut link = SerialLink::new(&settings.serial.device);
    let probe = ProtocolProbe::new(ProbeConfig {
        candidate_bauds: settings.serial.candidate_bauds.clone(),
        window: Duration::from_millis(settings.serial.probe_window_ms),
        fallback_baud: settings.serial.fallback_baud,
        ..ProbeConfig::default()
    });
    let outcome = probe.detect(&mut link).await;
    info!(
        "Receiver link settled: {} baud, {:?} protocol",
        outcome.baud, outcome.protocol
    );

    let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
    let state = Arc::new(AppState::new(tx.clone(), outcome.baud, outcome.protocol));

    let clock = SystemClock::new();
    let source = NmeaFixSource::with_line_max(clock.clone(), settings.publish.line_max);
    let publisher = StatusPublisher::new(settings.publish.interval_ms, clock.now_ms());
    let transport = BroadcastTransport::new(tx);
    let options = ingest::IngestOptions {
        forward_sentences: settings.publish.forward_sentences,
        line_max: settings.publish.line_max,
    };
    tokio::spawn(ingest::run(
        link, source, publisher, transport, clock, options,
    ));

    run_server(&settings.server.bind, state)
        .await
        .context("running monitor server")
}
