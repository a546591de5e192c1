// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{Router, routing::get};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

use crate::models::DashboardUpdate;
use crate::worker::LatestUpdate;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) updates_tx: broadcast::Sender<DashboardUpdate>,
    pub(crate) latest: LatestUpdate,
    pub(crate) ws_connections: Arc<AtomicUsize>,
}

pub fn app(
    updates_tx: broadcast::Sender<DashboardUpdate>,
    latest: LatestUpdate,
    ws_connections: Arc<AtomicUsize>,
) -> Router {
    let state = AppState {
        updates_tx,
        latest,
        ws_connections,
    };
    Router::new()
        .route("/", get(|| async { "dualmon: host/guest rate dashboard" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/rates", get(http::rates_handler)) // GET /api/rates
        .route("/api/rates/{source}", get(http::source_rates_handler)) // GET /api/rates/{source}
        .route("/ws/rates", get(ws::ws_rates)) // WS /ws/rates
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
