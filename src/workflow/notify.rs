//! Interactive review request payload.
//!
//! The core builds the full structured message (Slack Block Kit JSON) and
//! hands it to the messenger as data; the messenger renders nothing itself.
//! The approve button carries the encoded [`ApprovalContext`], which is the
//! only state that survives until the callback.

use serde_json::json;

use super::context::{ApprovalContext, ChangesContext};
use crate::types::PullRequestSnapshot;

/// Action id of the approve-and-merge button.
pub const ACTION_APPROVE: &str = "approve_pr";
/// Action id of the request-changes button.
pub const ACTION_REQUEST_CHANGES: &str = "request_changes";
/// Action id of the passive view-PR link button.
pub const ACTION_VIEW: &str = "view_pr";

/// A fully built interactive message, ready for the messenger.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRequest {
    /// Plain-text fallback shown in notifications.
    pub text: String,
    /// Block Kit structure rendered by the chat client.
    pub blocks: serde_json::Value,
}

/// Builds the review request message for an opened PR.
pub fn build_review_request(
    snapshot: &PullRequestSnapshot,
    summary: &str,
    context: &ApprovalContext,
) -> ReviewRequest {
    let changes = ChangesContext {
        pr_number: snapshot.number,
        pr_url: snapshot.url.clone(),
    };

    let blocks = json!([
        {
            "type": "header",
            "text": {
                "type": "plain_text",
                "text": format!("PR Review Request: {}", snapshot.title),
            }
        },
        {
            "type": "section",
            "fields": [
                { "type": "mrkdwn", "text": format!("*Author:*\n{}", snapshot.author) },
                { "type": "mrkdwn", "text": format!("*Task ID:*\n{}", context.task_id) },
                { "type": "mrkdwn", "text": format!("*Files Changed:*\n{}", snapshot.file_count()) },
                {
                    "type": "mrkdwn",
                    "text": format!(
                        "*Changes:*\n+{} -{}",
                        snapshot.total_additions, snapshot.total_deletions
                    )
                },
            ]
        },
        {
            "type": "section",
            "text": {
                "type": "mrkdwn",
                "text": format!("*AI Review Summary:*\n{summary}"),
            }
        },
        {
            "type": "actions",
            "block_id": "pr_review_actions",
            "elements": [
                {
                    "type": "button",
                    "text": { "type": "plain_text", "text": "Approve & Merge" },
                    "style": "primary",
                    "action_id": ACTION_APPROVE,
                    "value": context.encode(),
                },
                {
                    "type": "button",
                    "text": { "type": "plain_text", "text": "Request Changes" },
                    "style": "danger",
                    "action_id": ACTION_REQUEST_CHANGES,
                    "value": changes.encode(),
                },
                {
                    "type": "button",
                    "text": { "type": "plain_text", "text": "View PR" },
                    "action_id": ACTION_VIEW,
                    "url": snapshot.url,
                },
            ]
        },
    ]);

    ReviewRequest {
        text: format!("PR Review Request: {}", snapshot.title),
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChangedFile, PageId, PrNumber, TaskId};

    fn sample() -> (PullRequestSnapshot, ApprovalContext) {
        let snapshot = PullRequestSnapshot::new(
            PrNumber(7),
            "Fix parser",
            "body",
            "octocat",
            "https://github.com/org/repo/pull/7",
            "org/repo",
            vec![ChangedFile {
                filename: "a.rs".to_string(),
                additions: 4,
                deletions: 2,
                status: "modified".to_string(),
                patch: None,
            }],
        );
        let context = ApprovalContext {
            pr_number: PrNumber(7),
            task_id: TaskId::from("TASK-042"),
            notion_page_id: PageId::new("abc123"),
            repo: "org/repo".to_string(),
        };
        (snapshot, context)
    }

    #[test]
    fn approve_button_carries_encoded_context() {
        let (snapshot, context) = sample();
        let request = build_review_request(&snapshot, "summary text", &context);

        let actions = &request.blocks[3]["elements"];
        assert_eq!(actions[0]["action_id"], ACTION_APPROVE);
        let decoded =
            ApprovalContext::decode(actions[0]["value"].as_str()).unwrap();
        assert_eq!(decoded, context);
    }

    #[test]
    fn request_changes_button_carries_pr_url() {
        let (snapshot, context) = sample();
        let request = build_review_request(&snapshot, "summary", &context);

        let actions = &request.blocks[3]["elements"];
        assert_eq!(actions[1]["action_id"], ACTION_REQUEST_CHANGES);
        let decoded = ChangesContext::decode(actions[1]["value"].as_str()).unwrap();
        assert_eq!(decoded.pr_url, snapshot.url);
        assert_eq!(decoded.pr_number, PrNumber(7));
    }

    #[test]
    fn message_includes_summary_and_stats() {
        let (snapshot, context) = sample();
        let request = build_review_request(&snapshot, "the AI summary", &context);

        let rendered = request.blocks.to_string();
        assert!(rendered.contains("the AI summary"));
        assert!(rendered.contains("+4 -2"));
        assert!(request.text.contains("Fix parser"));
    }
}
