//! Typed decoding of GitHub webhook payloads.
//!
//! The ingress boundary decodes the raw JSON body into a typed
//! [`PullRequestEvent`] before any workflow logic runs. Structurally invalid
//! payloads are rejected here with a parse error rather than surfacing deep
//! inside the workflow.

use serde::Deserialize;
use thiserror::Error;

use crate::types::PrNumber;

/// Error type for webhook payload decoding failures.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON deserialization failed (includes missing required fields).
    #[error("invalid webhook payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// The pull request action carried in a `pull_request` webhook.
///
/// Only `opened` triggers the lifecycle workflow; every other action is
/// acknowledged and ignored, keeping the raw name for the response payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrAction {
    Opened,
    Other(String),
}

impl PrAction {
    pub fn parse(action: &str) -> PrAction {
        match action {
            "opened" => PrAction::Opened,
            other => PrAction::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PrAction::Opened => "opened",
            PrAction::Other(s) => s,
        }
    }
}

/// A decoded `pull_request` webhook event.
///
/// Ephemeral: constructed per delivery, consumed once by the workflow,
/// discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    pub action: PrAction,
    pub number: PrNumber,
    /// Canonical web URL of the PR.
    pub url: String,
    /// The PR description; empty when the author left it blank.
    pub description: String,
    /// Repository full name (`owner/repo`).
    pub repository: String,
}

// Raw structures matching GitHub's webhook JSON. Optional fields are
// normalized here so the workflow never sees nulls.

#[derive(Debug, Deserialize)]
struct RawPullRequestPayload {
    action: String,
    pull_request: RawPullRequest,
    repository: RawRepository,
}

#[derive(Debug, Deserialize)]
struct RawPullRequest {
    number: u64,
    html_url: String,
    #[serde(default)]
    body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    full_name: String,
}

/// Decodes a `pull_request` webhook body into a typed event.
pub fn parse_pull_request_event(payload: &[u8]) -> Result<PullRequestEvent, ParseError> {
    let raw: RawPullRequestPayload = serde_json::from_slice(payload)?;
    Ok(PullRequestEvent {
        action: PrAction::parse(&raw.action),
        number: PrNumber(raw.pull_request.number),
        url: raw.pull_request.html_url,
        description: raw.pull_request.body.unwrap_or_default(),
        repository: raw.repository.full_name,
    })
}
