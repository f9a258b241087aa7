//! Health check endpoint.
//!
//! Reports whether the service context was initialized. Intended for load
//! balancers and orchestration liveness probes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use super::AppState;

/// `GET /health`: 200 when the service context is present, 503 otherwise.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    if state.context().is_some() {
        (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "service": "devflow-bot",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "error": "service not initialized",
            })),
        )
    }
}
