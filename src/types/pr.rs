//! Pull request snapshot value object.
//!
//! A [`PullRequestSnapshot`] is assembled once per opened-PR workflow from the
//! code host's metadata and changed-file list. It is immutable after
//! construction and passed by reference to the summarizer and the Slack
//! message builder.

use serde::{Deserialize, Serialize};

use crate::types::PrNumber;

/// A single changed file in a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    pub filename: String,
    pub additions: u64,
    pub deletions: u64,
    /// The change kind as reported by the code host ("added", "modified",
    /// "removed", "renamed").
    pub status: String,
    /// Unified diff text for this file, when the code host provides one.
    /// Large or binary files come back without a patch.
    pub patch: Option<String>,
}

/// Everything the downstream steps need to know about a pull request.
///
/// Aggregates (`total_additions`, `total_deletions`) are computed over the
/// full file list; only presentation layers truncate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestSnapshot {
    pub number: PrNumber,
    pub title: String,
    pub body: String,
    pub author: String,
    pub url: String,
    /// The repository this snapshot belongs to, in `owner/repo` form.
    pub repository: String,
    pub files: Vec<ChangedFile>,
    pub total_additions: u64,
    pub total_deletions: u64,
}

impl PullRequestSnapshot {
    /// Builds a snapshot, computing the addition/deletion aggregates from the
    /// file list.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        number: PrNumber,
        title: impl Into<String>,
        body: impl Into<String>,
        author: impl Into<String>,
        url: impl Into<String>,
        repository: impl Into<String>,
        files: Vec<ChangedFile>,
    ) -> Self {
        let total_additions = files.iter().map(|f| f.additions).sum();
        let total_deletions = files.iter().map(|f| f.deletions).sum();
        PullRequestSnapshot {
            number,
            title: title.into(),
            body: body.into(),
            author: author.into(),
            url: url.into(),
            repository: repository.into(),
            files,
            total_additions,
            total_deletions,
        }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}
