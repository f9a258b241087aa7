//! The opened-PR lifecycle workflow.
//!
//! Linear state machine with failure exits:
//!
//! 1. Extract the task reference from the description — none means `Skipped`,
//!    before any adapter call.
//! 2. Look up the task record — not found (or lookup failure) means `Error`,
//!    before any mutation.
//! 3. Update the record to "Verify" with the PR url attached.
//! 4. Fetch the full PR snapshot from the code host.
//! 5. Generate the AI summary, degrading to a fixed fallback on failure.
//! 6. Post the summary as a PR comment.
//! 7. Send the interactive chat message with the embedded approval context.
//!
//! Past step 2 the workflow is best-effort: each downstream step has value on
//! its own, so a failure is logged and the remaining steps still run. The
//! exception is the snapshot fetch (step 4): the comment and the chat message
//! are built from the snapshot, so without it the workflow stops with
//! `Error`. Nothing is rolled back; the external systems cannot be updated
//! atomically and partial completion is accepted by design.

use tracing::{info, warn};

use super::context::ApprovalContext;
use super::extract::extract_task_reference;
use super::notify::build_review_request;
use super::summary::{review_comment, FALLBACK_SUMMARY};
use super::ServiceContext;
use crate::types::{TaskStatus, WorkflowResult};
use crate::webhooks::PullRequestEvent;

/// Runs the full opened-PR workflow for one event.
pub async fn handle_pr_opened(ctx: &ServiceContext, event: &PullRequestEvent) -> WorkflowResult {
    let pr = event.number;

    // Gating step 1: no reference means nothing to synchronize.
    let Some(task_id) = extract_task_reference(&event.description) else {
        warn!(pr = %pr, "no task reference found in PR description");
        return WorkflowResult::skipped("no task reference found in PR description");
    };

    // Gating step 2: an unresolvable reference is an error, and nothing has
    // been mutated yet.
    let page_id = match ctx.task_store.find_task(&task_id).await {
        Ok(Some(page_id)) => page_id,
        Ok(None) => {
            warn!(pr = %pr, task = %task_id, "task not found in store");
            return WorkflowResult::error(format!("task {task_id} not found"));
        }
        Err(error) => {
            warn!(pr = %pr, task = %task_id, error = %error, "task store lookup failed");
            return WorkflowResult::error(format!("task store lookup failed: {error}"));
        }
    };

    // From here on, individual failures are logged and the workflow
    // continues.
    if let Err(error) = ctx
        .task_store
        .update_task(&page_id, TaskStatus::Verify, Some(&event.url))
        .await
    {
        warn!(pr = %pr, task = %task_id, error = %error, "failed to update task to Verify");
    }

    let snapshot = match ctx.code_host.pull_request_snapshot(pr).await {
        Ok(snapshot) => snapshot,
        Err(error) => {
            warn!(pr = %pr, error = %error, "failed to fetch PR snapshot");
            return WorkflowResult::error(format!("failed to fetch PR {pr}: {error}"));
        }
    };

    let summary = match ctx.summarizer.summarize(&snapshot).await {
        Ok(summary) => summary,
        Err(error) => {
            warn!(pr = %pr, error = %error, "summarizer failed, using fallback");
            FALLBACK_SUMMARY.to_string()
        }
    };

    if let Err(error) = ctx.code_host.post_comment(pr, &review_comment(&summary)).await {
        warn!(pr = %pr, error = %error, "failed to post review comment");
    }

    let approval = ApprovalContext {
        pr_number: pr,
        task_id: task_id.clone(),
        notion_page_id: page_id,
        repo: event.repository.clone(),
    };
    let request = build_review_request(&snapshot, &summary, &approval);
    if let Err(error) = ctx
        .messenger
        .post_review_request(&ctx.default_channel, &request)
        .await
    {
        warn!(pr = %pr, error = %error, "failed to send chat notification");
    }

    info!(pr = %pr, task = %task_id, "processed opened PR");
    WorkflowResult::pr_processed(pr, &task_id)
}
