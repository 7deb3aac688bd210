//! Receiver Ingest Loop
//!
//! The one loop that touches the link after startup: drain whatever bytes
//! are available, feed the decoder, forward completed sentence lines, and
//! fire the status publisher on its cadence. Everything it owns is
//! single-owner state; there is nothing to lock.

use fix_decoder::FixSource;
use gnss_link::{MonotonicClock, SentenceAccumulator, UartLink, DEFAULT_LINE_MAX};
use status_publisher::{StatusMessage, StatusPublisher, Transport};
use std::time::Duration;
use tracing::warn;

/// How long one loop iteration waits for serial data
const READ_WAIT: Duration = Duration::from_millis(20);

/// Pause after a link read failure before trying again
const RETRY_PAUSE: Duration = Duration::from_millis(500);

/// Options for the ingest loop
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Forward completed raw sentence lines to observers
    pub forward_sentences: bool,
    /// Maximum accepted line length, terminator included
    pub line_max: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            forward_sentences: true,
            line_max: DEFAULT_LINE_MAX,
        }
    }
}

/// Drive the receiver until the process is shut down externally
///
/// Link read failures are logged and retried after a pause; no anomaly
/// terminates the loop.
pub async fn run<L, S, T, C>(
    mut link: L,
    mut source: S,
    mut publisher: StatusPublisher,
    transport: T,
    clock: C,
    options: IngestOptions,
) where
    L: UartLink,
    S: FixSource,
    T: Transport,
    C: MonotonicClock,
{
    let mut accumulator = SentenceAccumulator::new(options.line_max);
    let mut buf = [0u8; 256];
    loop {
        step(
            &mut link,
            &mut source,
            &mut accumulator,
            &mut publisher,
            &transport,
            &clock,
            &options,
            &mut buf,
        )
        .await;
        tokio::task::yield_now().await;
    }
}

/// One loop iteration: drain available bytes, then evaluate the cadence
#[allow(clippy::too_many_arguments)]
async fn step<L, S, T, C>(
    link: &mut L,
    source: &mut S,
    accumulator: &mut SentenceAccumulator,
    publisher: &mut StatusPublisher,
    transport: &T,
    clock: &C,
    options: &IngestOptions,
    buf: &mut [u8],
) where
    L: UartLink,
    S: FixSource,
    T: Transport,
    C: MonotonicClock,
{
    match link.read(buf, READ_WAIT).await {
        Ok(n) => {
            for &byte in &buf[..n] {
                source.feed(byte);
                if options.forward_sentences {
                    if let Some(line) = accumulator.feed(byte) {
                        forward_line(transport, &line);
                    }
                }
            }
        }
        Err(e) => {
            warn!("Link read failed: {}; retrying", e);
            tokio::time::sleep(RETRY_PAUSE).await;
        }
    }

    if let Some(snapshot) = publisher.tick(clock.now_ms(), source) {
        if let Some(wire) = StatusMessage::new(snapshot).to_wire() {
            transport.publish(&wire);
        }
    }
}

/// Forward one completed line verbatim, minus terminator and CR
fn forward_line<T: Transport>(transport: &T, line: &[u8]) {
    let text = String::from_utf8_lossy(line);
    let text = text.trim_end_matches('\r');
    if !text.is_empty() {
        transport.publish(text);
    }
}
