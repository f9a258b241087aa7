//! GitHub webhook endpoint.
//!
//! Single authenticated entry point for code host events: verify the
//! HMAC-SHA256 signature over the raw body, classify by event type and
//! action, and dispatch `pull_request` / `opened` to the lifecycle workflow.
//! Every other recognized outcome is acknowledged with a structured status
//! payload.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::AppState;
use crate::webhooks::{parse_pull_request_event, verify_signature, ParseError, PrAction};
use crate::workflow::handle_pr_opened;

/// Header naming the event type.
const HEADER_EVENT: &str = "x-github-event";
/// Header carrying the HMAC-SHA256 signature.
const HEADER_SIGNATURE: &str = "x-hub-signature-256";

/// Errors surfaced at the webhook HTTP boundary.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The service context failed to initialize at startup.
    #[error("service not initialized")]
    Uninitialized,

    /// Bad or missing signature. Rejected before any processing; the body is
    /// never logged.
    #[error("invalid signature")]
    InvalidSignature,

    /// Missing required header.
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    /// Structurally invalid payload, rejected at the decode boundary.
    #[error(transparent)]
    InvalidPayload(#[from] ParseError),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebhookError::Uninitialized => StatusCode::SERVICE_UNAVAILABLE,
            WebhookError::InvalidSignature => StatusCode::FORBIDDEN,
            WebhookError::MissingHeader(_) => StatusCode::BAD_REQUEST,
            WebhookError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// `POST /webhook` handler.
pub async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, WebhookError> {
    let ctx = state.context().ok_or(WebhookError::Uninitialized)?;

    // Signature first, over the raw bytes, before any parsing. A missing
    // header is the same rejection as a wrong signature.
    let signature = headers
        .get(HEADER_SIGNATURE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !verify_signature(&body, signature, state.webhook_secret()) {
        warn!("invalid webhook signature");
        return Err(WebhookError::InvalidSignature);
    }

    let event_type = headers
        .get(HEADER_EVENT)
        .and_then(|v| v.to_str().ok())
        .ok_or(WebhookError::MissingHeader(HEADER_EVENT))?;
    debug!(event_type, "received webhook");

    if event_type != "pull_request" {
        return Ok(Json(json!({ "status": "processed", "event": event_type })));
    }

    let event = parse_pull_request_event(&body)?;
    match &event.action {
        PrAction::Opened => {
            let result = handle_pr_opened(ctx, &event).await;
            info!(pr = %event.number, status = ?result.status, "opened workflow finished");
            Ok(Json(serde_json::to_value(&result).unwrap_or_default()))
        }
        PrAction::Other(action) => {
            debug!(action, "ignoring PR action");
            Ok(Json(json!({ "status": "ignored", "action": action })))
        }
    }
}
