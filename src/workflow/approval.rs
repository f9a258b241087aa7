//! The approval callback workflow.
//!
//! Triggered when a human clicks a button on the review request message.
//! Approve-and-merge issues the merge and, on success, moves the task to
//! "Done". Merge failure of any kind leaves the task record untouched.
//!
//! There is no idempotency guard: a second click issues a second merge
//! attempt. The code host then reports the PR as no-longer-mergeable, which
//! surfaces as a visible `Error` result with zero additional status
//! mutations.

use tracing::{info, warn};

use super::context::ApprovalContext;
use super::ServiceContext;
use crate::services::MergeError;
use crate::types::{TaskStatus, WorkflowResult};

/// Merges the PR identified by the decoded context and marks its task Done.
pub async fn handle_approval(ctx: &ServiceContext, approval: &ApprovalContext) -> WorkflowResult {
    let pr = approval.pr_number;

    match ctx.code_host.merge_pull_request(pr).await {
        Ok(()) => {}
        Err(MergeError::NotMergeable(pr)) => {
            warn!(pr = %pr, "merge precondition failed");
            return WorkflowResult::error(format!(
                "failed to merge PR {pr}: not mergeable"
            ));
        }
        Err(MergeError::Service(error)) => {
            warn!(pr = %pr, error = %error, "merge failed");
            return WorkflowResult::error(format!("failed to merge PR {pr}: {error}"));
        }
    }

    // Merge succeeded; the Done transition is best-effort like every other
    // post-gating step.
    if let Err(error) = ctx
        .task_store
        .update_task(&approval.notion_page_id, TaskStatus::Done, None)
        .await
    {
        warn!(
            pr = %pr,
            task = %approval.task_id,
            error = %error,
            "merged but failed to mark task Done"
        );
    }

    info!(pr = %pr, task = %approval.task_id, "PR approved and merged");
    WorkflowResult::pr_merged(pr, &approval.task_id)
}
