//! GNSS Monitor Server
//!
//! HTTP and WebSocket front end for the receiver monitor: serves the
//! dashboard page, fans published messages out to WebSocket observers,
//! and exposes a health endpoint.

use axum::{extract::State, response::Html, response::IntoResponse, routing::get, Json, Router};
use gnss_link::WireProtocol;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod ingest;
pub mod settings;
mod transport;
mod ws;

pub use transport::BroadcastTransport;

/// Embedded dashboard page
const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Application state shared across handlers
///
/// The link fields are fixed once at startup, after the probe has run;
/// handlers only read them.
pub struct AppState {
    /// Fan-out channel feeding every connected observer
    pub tx: broadcast::Sender<String>,
    /// Baud rate the receiver link settled on
    pub baud: u32,
    /// Wire protocol classification from the startup probe
    pub protocol: WireProtocol,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create application state for a probed link
    pub fn new(tx: broadcast::Sender<String>, baud: u32, protocol: WireProtocol) -> Self {
        Self {
            tx,
            baud,
            protocol,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub link: LinkHealth,
    pub metrics: ServerMetrics,
}

/// Receiver link state as settled at startup
#[derive(Debug, Serialize)]
pub struct LinkHealth {
    pub baud: u32,
    pub protocol: WireProtocol,
}

/// Server-side counters
#[derive(Debug, Serialize)]
pub struct ServerMetrics {
    pub observers: usize,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/ws", get(ws::ws_handler))
        .route("/api/v1/health", get(health_handler))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the embedded dashboard page
async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        link: LinkHealth {
            baud: state.baud,
            protocol: state.protocol,
        },
        metrics: ServerMetrics {
            observers: state.tx.receiver_count(),
        },
    })
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Run the server until shutdown
pub async fn run_server(addr: &str, state: Arc<AppState>) -> std::io::Result<()> {
    let app = create_router(state);

    info!("Starting monitor server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        let (tx, _rx) = broadcast::channel(8);
        Arc::new(AppState::new(tx, 9_600, WireProtocol::Nmea))
    }

    #[tokio::test]
    async fn test_index_serves_dashboard() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let page = String::from_utf8(body.to_vec()).unwrap();
        assert!(page.contains("<html"));
        assert!(page.contains("/ws"));
    }

    #[tokio::test]
    async fn test_health_reports_link_state() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["status"], "healthy");
        assert_eq!(value["link"]["baud"], 9_600);
        assert_eq!(value["link"]["protocol"], "nmea");
        assert_eq!(value["metrics"]["observers"], 0);
    }
}
