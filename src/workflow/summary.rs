//! Review prompt and comment rendering.
//!
//! The prompt given to the summarizer is bounded: only the first
//! [`PROMPT_FILE_LIMIT`] changed files are listed, with a trailing note of how
//! many more exist. This is a presentation truncation only; the
//! additions/deletions aggregates always cover the full file list.

use crate::types::PullRequestSnapshot;

/// Maximum number of changed files listed in the summarizer prompt.
pub const PROMPT_FILE_LIMIT: usize = 10;

/// Maximum PR description length included in the prompt.
const PROMPT_BODY_LIMIT: usize = 500;

/// Fixed text used when the summarizer fails. The workflow never aborts on
/// summarizer failure; it posts this instead.
pub const FALLBACK_SUMMARY: &str = "AI review unavailable. Please review manually.";

/// Builds the natural-language review prompt for a PR snapshot.
pub fn build_review_prompt(snapshot: &PullRequestSnapshot) -> String {
    let mut file_list = snapshot
        .files
        .iter()
        .take(PROMPT_FILE_LIMIT)
        .map(|f| {
            format!(
                "- `{}`: {} (+{}/-{})",
                f.filename, f.status, f.additions, f.deletions
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    if snapshot.file_count() > PROMPT_FILE_LIMIT {
        file_list.push_str(&format!(
            "\n... and {} more files",
            snapshot.file_count() - PROMPT_FILE_LIMIT
        ));
    }

    let description = if snapshot.body.is_empty() {
        "No description provided"
    } else {
        truncate_at_char_boundary(&snapshot.body, PROMPT_BODY_LIMIT)
    };

    format!(
        "Review this pull request and provide a concise summary:\n\
         \n\
         **PR Title:** {title}\n\
         **Author:** {author}\n\
         **Description:** {description}\n\
         \n\
         **Files Changed ({count}):**\n\
         {file_list}\n\
         \n\
         **Total Changes:** +{additions} additions, -{deletions} deletions\n\
         \n\
         Please provide:\n\
         1. A brief summary of what this PR does (2-3 sentences)\n\
         2. Any potential concerns or things to review carefully\n\
         3. Overall assessment (Low/Medium/High complexity)\n\
         \n\
         Keep the response concise and actionable.",
        title = snapshot.title,
        author = snapshot.author,
        description = description,
        count = snapshot.file_count(),
        file_list = file_list,
        additions = snapshot.total_additions,
        deletions = snapshot.total_deletions,
    )
}

/// Renders the summary into the PR comment body.
pub fn review_comment(summary: &str) -> String {
    format!("## AI Code Review\n\n{summary}\n\n---\n*Generated by devflow-bot*")
}

/// Truncates to at most `limit` bytes without splitting a UTF-8 character.
fn truncate_at_char_boundary(s: &str, limit: usize) -> &str {
    if s.len() <= limit {
        return s;
    }
    let mut end = limit;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChangedFile, PrNumber};

    fn snapshot_with_files(count: usize) -> PullRequestSnapshot {
        let files = (0..count)
            .map(|i| ChangedFile {
                filename: format!("src/file_{i}.rs"),
                additions: 2,
                deletions: 1,
                status: "modified".to_string(),
                patch: None,
            })
            .collect();
        PullRequestSnapshot::new(
            PrNumber(7),
            "Fix parser",
            "A description",
            "octocat",
            "https://github.com/org/repo/pull/7",
            "org/repo",
            files,
        )
    }

    #[test]
    fn prompt_lists_all_files_under_the_limit() {
        let prompt = build_review_prompt(&snapshot_with_files(3));
        assert!(prompt.contains("src/file_0.rs"));
        assert!(prompt.contains("src/file_2.rs"));
        assert!(!prompt.contains("more files"));
    }

    #[test]
    fn prompt_truncates_file_list_with_trailing_note() {
        let prompt = build_review_prompt(&snapshot_with_files(14));
        assert!(prompt.contains("src/file_9.rs"));
        assert!(!prompt.contains("src/file_10.rs"));
        assert!(prompt.contains("... and 4 more files"));
        // Aggregates still cover the full list.
        assert!(prompt.contains("+28 additions, -14 deletions"));
        assert!(prompt.contains("Files Changed (14)"));
    }

    #[test]
    fn prompt_handles_empty_description() {
        let mut snapshot = snapshot_with_files(1);
        snapshot.body = String::new();
        let prompt = build_review_prompt(&snapshot);
        assert!(prompt.contains("No description provided"));
    }

    #[test]
    fn prompt_bounds_long_descriptions() {
        let mut snapshot = snapshot_with_files(1);
        snapshot.body = "x".repeat(2000);
        let prompt = build_review_prompt(&snapshot);
        assert!(!prompt.contains(&"x".repeat(501)));
        assert!(prompt.contains(&"x".repeat(500)));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // 'é' is two bytes; a naive byte slice at 3 would panic.
        assert_eq!(truncate_at_char_boundary("ééé", 3), "é");
        assert_eq!(truncate_at_char_boundary("abc", 10), "abc");
    }

    #[test]
    fn comment_frames_the_summary() {
        let comment = review_comment("Looks reasonable.");
        assert!(comment.starts_with("## AI Code Review"));
        assert!(comment.contains("Looks reasonable."));
        assert!(comment.contains("devflow-bot"));
    }
}
