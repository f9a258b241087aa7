//! Shared workflow result and task status types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{PrNumber, TaskId};

/// Task store status values the core transitions between.
///
/// The store defines more statuses than these; the core only ever writes
/// `Verify` (PR opened, awaiting review) and `Done` (PR merged).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Verify,
    Done,
}

impl TaskStatus {
    /// The status name as stored in the task store's select property.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Verify => "Verify",
            TaskStatus::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of a workflow invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    /// The workflow ran to completion (possibly with logged, non-fatal
    /// adapter failures along the way).
    Success,
    /// The event carried no task reference; nothing was done.
    Skipped,
    /// A gating step failed; no further mutations were attempted.
    Error,
}

/// The uniform return contract of every top-level workflow operation.
///
/// Serialized directly into webhook responses as `{"status":..,"message":..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub status: WorkflowStatus,
    pub message: String,
}

impl WorkflowResult {
    pub fn success(message: impl Into<String>) -> Self {
        WorkflowResult {
            status: WorkflowStatus::Success,
            message: message.into(),
        }
    }

    pub fn skipped(message: impl Into<String>) -> Self {
        WorkflowResult {
            status: WorkflowStatus::Skipped,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        WorkflowResult {
            status: WorkflowStatus::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == WorkflowStatus::Success
    }

    /// The standard success message for a processed opened-PR event.
    pub fn pr_processed(pr: PrNumber, task: &TaskId) -> Self {
        Self::success(format!("PR {pr} processed for task {task}"))
    }

    /// The standard success message for an approved-and-merged PR.
    pub fn pr_merged(pr: PrNumber, task: &TaskId) -> Self {
        Self::success(format!("PR {pr} merged and task {task} marked as Done"))
    }
}
