//! Task reference extraction from free-form PR text.
//!
//! PR descriptions link back to the task store with a label line such as
//! `Notion Task: TASK-042`. Labels are tried in a fixed priority order; the
//! first pattern that matches anywhere in the text wins, even if a later
//! pattern would also match. Absence of a reference is a normal outcome, not
//! an error.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::TaskId;

/// Label patterns in priority order. Each matches the label followed by an
/// identifier of the form `[A-Za-z]+-[0-9]+`, case-insensitively.
static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["Notion Task:", "Task:", "Task ID:"]
        .iter()
        .map(|label| {
            Regex::new(&format!(r"(?i){}\s*([A-Za-z]+-[0-9]+)", regex::escape(label)))
                .expect("label pattern compiles")
        })
        .collect()
});

/// Extracts the first task reference from PR description text.
///
/// The matched identifier is returned verbatim (the task store lookup is an
/// exact string match). Returns `None` for empty text or when no pattern
/// matches.
pub fn extract_task_reference(text: &str) -> Option<TaskId> {
    if text.is_empty() {
        return None;
    }
    for pattern in PATTERNS.iter() {
        if let Some(captures) = pattern.captures(text) {
            return Some(TaskId::new(&captures[1]));
        }
    }
    None
}
