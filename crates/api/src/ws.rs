//! WebSocket Observer Handling
//!
//! Each connected observer gets a one-shot welcome message carrying the
//! configured baud, then a live feed of everything published through the
//! broadcast channel. Observers that fall behind lose messages rather
//! than slowing the publisher down.

use crate::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// One-shot greeting for a newly attached observer
#[derive(Debug, Serialize)]
struct WelcomeMessage {
    #[serde(rename = "type")]
    kind: &'static str,
    baud: u32,
}

/// Upgrade an observer connection to a WebSocket
pub async fn ws_handler(
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Stream published messages to one observer until it disconnects
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let welcome = WelcomeMessage {
        kind: "welcome",
        baud: state.baud,
    };
    if let Ok(json) = serde_json::to_string(&welcome) {
        if socket.send(Message::Text(json)).await.is_err() {
            return;
        }
    }

    let mut rx = state.tx.subscribe();
    loop {
        tokio::select! {
            published = rx.recv() => match published {
                Ok(text) => {
                    if socket.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("Observer lagged, {} messages dropped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                // Observers only listen; drain anything they send.
                Some(Ok(_)) => {}
                _ => break,
            },
        }
    }
    debug!("Observer disconnected");
}
