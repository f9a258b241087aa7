//! Approval context: the bundle that survives between the two workflows.
//!
//! The opened-PR workflow embeds an [`ApprovalContext`] into the Slack
//! message's approve button; the callback handler decodes it later to trace
//! the human decision back to its PR and task record. It is the only
//! cross-request state the core carries, and its sole transport channel is
//! the messaging service's opaque `value` field. The core holds no
//! server-side session for it, so the bundle must round-trip byte-for-byte,
//! and an incomplete decode is a loud failure rather than a guess.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{PageId, PrNumber, TaskId};

/// Decode failure for an embedded interaction payload.
#[derive(Debug, Error)]
pub enum ContextError {
    /// The button carried no value field.
    #[error("interaction action has no embedded value")]
    MissingValue,

    /// The value was present but structurally invalid or incomplete.
    #[error("malformed approval context: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The opaque bundle embedded in the approve button.
///
/// Wire keys are fixed by the callback protocol: `pr_number`, `task_id`,
/// `notion_page_id`, `repo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalContext {
    pub pr_number: PrNumber,
    pub task_id: TaskId,
    pub notion_page_id: PageId,
    pub repo: String,
}

impl ApprovalContext {
    /// Serializes the context for embedding in a button value.
    pub fn encode(&self) -> String {
        // Serialization of a plain struct with string/number fields cannot
        // fail.
        serde_json::to_string(self).expect("approval context serializes")
    }

    /// Decodes a context from a button value. Missing fields fail loudly;
    /// the core never infers them.
    pub fn decode(value: Option<&str>) -> Result<Self, ContextError> {
        let value = value.ok_or(ContextError::MissingValue)?;
        Ok(serde_json::from_str(value)?)
    }
}

/// The smaller bundle embedded in the request-changes button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangesContext {
    pub pr_number: PrNumber,
    pub pr_url: String,
}

impl ChangesContext {
    pub fn encode(&self) -> String {
        serde_json::to_string(self).expect("changes context serializes")
    }

    pub fn decode(value: Option<&str>) -> Result<Self, ContextError> {
        let value = value.ok_or(ContextError::MissingValue)?;
        Ok(serde_json::from_str(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ApprovalContext {
        ApprovalContext {
            pr_number: PrNumber(7),
            task_id: TaskId::from("TASK-042"),
            notion_page_id: PageId::new("abc123"),
            repo: "org/repo".to_string(),
        }
    }

    #[test]
    fn approval_context_round_trips() {
        let context = sample();
        let decoded = ApprovalContext::decode(Some(&context.encode())).unwrap();
        assert_eq!(decoded, context);
    }

    #[test]
    fn wire_keys_are_stable() {
        let json: serde_json::Value = serde_json::from_str(&sample().encode()).unwrap();
        assert_eq!(json["pr_number"], 7);
        assert_eq!(json["task_id"], "TASK-042");
        assert_eq!(json["notion_page_id"], "abc123");
        assert_eq!(json["repo"], "org/repo");
    }

    #[test]
    fn missing_value_fails() {
        assert!(matches!(
            ApprovalContext::decode(None),
            Err(ContextError::MissingValue)
        ));
    }

    #[test]
    fn incomplete_bundle_fails() {
        // notion_page_id missing: must error, never infer.
        let value = r#"{"pr_number":7,"task_id":"TASK-042","repo":"org/repo"}"#;
        assert!(matches!(
            ApprovalContext::decode(Some(value)),
            Err(ContextError::Malformed(_))
        ));
    }

    #[test]
    fn type_mismatch_fails() {
        let value = r#"{"pr_number":"seven","task_id":"TASK-042","notion_page_id":"abc","repo":"r"}"#;
        assert!(ApprovalContext::decode(Some(value)).is_err());
    }

    #[test]
    fn changes_context_round_trips() {
        let context = ChangesContext {
            pr_number: PrNumber(9),
            pr_url: "https://github.com/org/repo/pull/9".to_string(),
        };
        let decoded = ChangesContext::decode(Some(&context.encode())).unwrap();
        assert_eq!(decoded, context);
    }
}
