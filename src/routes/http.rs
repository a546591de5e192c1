// GET handlers: version, latest rates

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::AppState;
use crate::models::Source;
use crate::version::{NAME, VERSION};

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/rates — latest update; 204 until the worker has completed a tick.
pub(super) async fn rates_handler(State(state): State<AppState>) -> Response {
    match state.latest.read().await.as_ref() {
        Some(update) => Json(update.clone()).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// GET /api/rates/{source} — latest report for "host" or "guest".
pub(super) async fn source_rates_handler(
    State(state): State<AppState>,
    Path(source): Path<String>,
) -> Response {
    let Some(source) = Source::parse(&source) else {
        return (StatusCode::NOT_FOUND, format!("unknown source: {}", source)).into_response();
    };
    let latest = state.latest.read().await;
    match latest.as_ref().and_then(|u| u.report(source)) {
        Some(report) => Json(report.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, format!("no data for {}", source)).into_response(),
    }
}
