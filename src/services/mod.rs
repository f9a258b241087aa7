//! External service adapters.
//!
//! The workflows talk to four external systems through the traits defined
//! here: the Notion task store, the GitHub code host, the Slack messenger,
//! and the OpenAI summarizer. Each trait is a thin typed surface over the
//! remote API; the real clients live in the submodules and tests substitute
//! recording mocks.
//!
//! Every adapter call is a blocking network call from the workflow's
//! perspective; the shared reqwest client carries a bounded timeout so a slow
//! dependency cannot hold a worker indefinitely. Timeouts surface as ordinary
//! [`ServiceError`]s, not as a special case.

pub mod github;
pub mod notion;
pub mod openai;
pub mod slack;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{PageId, PrNumber, PullRequestSnapshot, TaskId, TaskStatus};
use crate::workflow::notify::ReviewRequest;

pub use github::{GitHubAuth, GitHubClient};
pub use notion::NotionClient;
pub use openai::OpenAiClient;
pub use slack::SlackClient;

use std::time::Duration;

/// Timeout applied to every outbound adapter call.
pub const ADAPTER_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the reqwest client shared by all adapters.
pub fn http_client() -> Result<reqwest::Client, ServiceError> {
    Ok(reqwest::Client::builder()
        .timeout(ADAPTER_TIMEOUT)
        .user_agent(concat!("devflow-bot/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Error type shared by all service adapters.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Transport-level failure, including timeouts.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote API answered with a non-success status.
    #[error("{service} returned {status}: {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// The remote answered 2xx but the body was not what we expected.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Authentication setup failed (e.g., GitHub App token exchange).
    #[error("authentication failed: {0}")]
    Auth(String),
}

impl ServiceError {
    pub(crate) fn api(service: &'static str, status: u16, message: impl Into<String>) -> Self {
        ServiceError::Api {
            service,
            status,
            message: message.into(),
        }
    }
}

/// Merge failures, separated so the chat layer can render a precondition
/// failure distinctly from a transport failure.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The code host reported the PR as not mergeable (conflicts, blocking
    /// checks, or already closed). Mergeability is judged solely by the code
    /// host; the core never recomputes it.
    #[error("PR {0} is not mergeable")]
    NotMergeable(PrNumber),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// The external task store, keyed by human-readable task id.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Looks up the opaque record id for a task reference.
    /// Returns `Ok(None)` when no record matches.
    async fn find_task(&self, task_id: &TaskId) -> Result<Option<PageId>, ServiceError>;

    /// Updates a record's status, optionally attaching a PR link.
    async fn update_task(
        &self,
        page_id: &PageId,
        status: TaskStatus,
        pr_link: Option<&str>,
    ) -> Result<(), ServiceError>;
}

/// The code host, scoped to the single configured repository.
#[async_trait]
pub trait CodeHost: Send + Sync {
    /// Fetches full PR metadata and the changed-file list.
    async fn pull_request_snapshot(
        &self,
        number: PrNumber,
    ) -> Result<PullRequestSnapshot, ServiceError>;

    /// Merges the PR if the code host reports it mergeable at call time.
    async fn merge_pull_request(&self, number: PrNumber) -> Result<(), MergeError>;

    /// Posts a comment on the PR's conversation thread.
    async fn post_comment(&self, number: PrNumber, body: &str) -> Result<(), ServiceError>;
}

/// The chat service used for interactive review notifications.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Posts an interactive review request; returns the message timestamp so
    /// the message can be updated later.
    async fn post_review_request(
        &self,
        channel: &str,
        request: &ReviewRequest,
    ) -> Result<String, ServiceError>;

    /// Replaces the text of a previously posted message.
    async fn update_message(
        &self,
        channel: &str,
        ts: &str,
        text: &str,
    ) -> Result<(), ServiceError>;
}

/// The AI review summarizer. Best-effort: output is bounded natural language
/// with no correctness guarantee, and callers degrade to a fallback string on
/// failure.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, snapshot: &PullRequestSnapshot) -> Result<String, ServiceError>;
}
