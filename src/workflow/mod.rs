//! The orchestration core: task-reference extraction, the opened-PR
//! lifecycle workflow, and the approval callback workflow.
//!
//! Both workflows run against an immutable [`ServiceContext`] built once at
//! process start and passed by reference from the HTTP layer. There are no
//! module-level singletons and no reinitialization path. The two workflows
//! never call each other; the only state linking them is the
//! [`context::ApprovalContext`] carried through the chat message and the
//! durable task record in the external store.

pub mod approval;
pub mod context;
pub mod extract;
pub mod notify;
pub mod opened;
pub mod summary;

use std::sync::Arc;

use crate::services::{CodeHost, Messenger, Summarizer, TaskStore};
use crate::types::RepoId;

pub use approval::handle_approval;
pub use context::{ApprovalContext, ChangesContext, ContextError};
pub use extract::extract_task_reference;
pub use opened::handle_pr_opened;

/// Immutable per-process context shared by both workflows.
///
/// Constructed once from validated configuration; never mutated afterward.
pub struct ServiceContext {
    pub task_store: Arc<dyn TaskStore>,
    pub code_host: Arc<dyn CodeHost>,
    pub messenger: Arc<dyn Messenger>,
    pub summarizer: Arc<dyn Summarizer>,
    /// Channel the review request is posted to.
    pub default_channel: String,
    /// The single repository this deployment serves.
    pub repository: RepoId,
}
