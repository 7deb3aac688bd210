//! Broadcast-Backed Transport

use status_publisher::Transport;
use tokio::sync::broadcast;

/// Fan-out transport over a tokio broadcast channel
///
/// Sending never blocks; with no observers attached the message is simply
/// dropped, which is the expected idle state.
pub struct BroadcastTransport {
    tx: broadcast::Sender<String>,
}

impl BroadcastTransport {
    /// Wrap a broadcast sender as the publish capability
    pub fn new(tx: broadcast::Sender<String>) -> Self {
        Self { tx }
    }
}

impl Transport for BroadcastTransport {
    fn publish(&self, message: &str) {
        // send only errors when there are no receivers; not a fault here.
        let _ = self.tx.send(message.to_string());
    }
}
