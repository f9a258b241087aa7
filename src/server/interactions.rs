//! Slack interactive-callback endpoint.
//!
//! Slack posts interactions as a form-encoded body whose `payload` field is a
//! JSON document with an `actions` array. Only the first action is
//! inspected; its `action_id` selects the workflow. Every handled path
//! returns a short human-readable acknowledgment; undecodable payloads are
//! rejected at the boundary with a client error.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use super::AppState;
use crate::workflow::notify::{ACTION_APPROVE, ACTION_REQUEST_CHANGES};
use crate::workflow::{handle_approval, ApprovalContext, ChangesContext, ContextError};

/// Errors surfaced at the interactions HTTP boundary.
#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("service not initialized")]
    Uninitialized,

    /// The `payload` field was not valid JSON.
    #[error("invalid interaction payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// The payload carried no actions.
    #[error("interaction payload has no actions")]
    MissingAction,

    /// The embedded context was missing or incomplete. Loud by design: the
    /// core never infers missing fields of the approval bundle.
    #[error(transparent)]
    Context(#[from] ContextError),
}

impl IntoResponse for InteractionError {
    fn into_response(self) -> Response {
        let status = match &self {
            InteractionError::Uninitialized => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "text": format!("Error: {self}") }))).into_response()
    }
}

/// The form body Slack posts to the interactions URL.
#[derive(Debug, Deserialize)]
pub struct InteractionForm {
    payload: String,
}

#[derive(Debug, Deserialize)]
struct InteractionPayload {
    #[serde(default)]
    actions: Vec<InteractionAction>,
}

#[derive(Debug, Deserialize)]
struct InteractionAction {
    action_id: String,
    #[serde(default)]
    value: Option<String>,
}

/// `POST /slack/interactions` handler.
pub async fn interactions_handler(
    State(state): State<AppState>,
    Form(form): Form<InteractionForm>,
) -> Result<Json<serde_json::Value>, InteractionError> {
    let ctx = state.context().ok_or(InteractionError::Uninitialized)?;

    let payload: InteractionPayload = serde_json::from_str(&form.payload)?;
    let action = payload
        .actions
        .into_iter()
        .next()
        .ok_or(InteractionError::MissingAction)?;
    info!(action_id = %action.action_id, "received interaction");

    match action.action_id.as_str() {
        ACTION_APPROVE => {
            let approval = ApprovalContext::decode(action.value.as_deref())?;
            let result = handle_approval(ctx, &approval).await;
            let text = if result.is_success() {
                result.message
            } else {
                warn!(pr = %approval.pr_number, message = %result.message, "approval failed");
                format!("Error: {}", result.message)
            };
            Ok(Json(json!({ "text": text })))
        }
        ACTION_REQUEST_CHANGES => {
            let changes = ChangesContext::decode(action.value.as_deref())?;
            Ok(Json(json!({
                "text": format!(
                    "Please review and request changes on the PR: {}",
                    changes.pr_url
                )
            })))
        }
        _ => Ok(Json(json!({ "text": "Action processed" }))),
    }
}
