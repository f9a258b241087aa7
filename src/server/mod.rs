//! HTTP server for the devflow bot.
//!
//! Endpoints:
//!
//! - `POST /webhook` - GitHub webhook deliveries (signature-verified)
//! - `POST /slack/interactions` - Slack interactive callbacks
//! - `GET /health` - liveness probe
//!
//! The server holds no mutable state across requests: [`AppState`] wraps the
//! immutable service context built once at startup.

use std::sync::Arc;

pub mod health;
pub mod interactions;
pub mod webhook;

pub use health::health_handler;
pub use interactions::interactions_handler;
pub use webhook::webhook_handler;

use crate::workflow::ServiceContext;

/// Shared application state, passed to handlers via axum's `State` extractor.
///
/// `inner` is `None` only when startup initialization failed; the endpoints
/// then answer 503 rather than processing anything.
#[derive(Clone)]
pub struct AppState {
    inner: Option<Arc<AppStateInner>>,
}

struct AppStateInner {
    ctx: ServiceContext,
    webhook_secret: Vec<u8>,
}

impl AppState {
    pub fn new(ctx: ServiceContext, webhook_secret: impl Into<Vec<u8>>) -> Self {
        AppState {
            inner: Some(Arc::new(AppStateInner {
                ctx,
                webhook_secret: webhook_secret.into(),
            })),
        }
    }

    /// State for a server whose initialization failed.
    pub fn uninitialized() -> Self {
        AppState { inner: None }
    }

    pub fn context(&self) -> Option<&ServiceContext> {
        self.inner.as_deref().map(|inner| &inner.ctx)
    }

    /// The webhook secret; empty when uninitialized (verification is only
    /// reached with an initialized state).
    pub fn webhook_secret(&self) -> &[u8] {
        self.inner
            .as_deref()
            .map(|inner| inner.webhook_secret.as_slice())
            .unwrap_or(&[])
    }
}

/// Builds the axum router with all endpoints.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/webhook", post(webhook_handler))
        .route("/slack/interactions", post(interactions_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}
