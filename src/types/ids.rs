//! Newtype wrappers for domain identifiers.
//!
//! These types prevent accidental mixing of different identifiers (e.g., using
//! a Notion page id where a task id is expected) and make the code more
//! self-documenting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A pull request number within the configured repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrNumber(pub u64);

impl fmt::Display for PrNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for PrNumber {
    fn from(n: u64) -> Self {
        PrNumber(n)
    }
}

/// A human-readable task reference extracted from PR text (e.g., `TASK-042`).
///
/// This is the lookup key into the task store, not the store's own record id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(s: impl Into<String>) -> Self {
        TaskId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

/// The task store's opaque record identifier (a Notion page id).
///
/// The core never interprets this value; it only passes it back to the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub String);

impl PageId {
    pub fn new(s: impl Into<String>) -> Self {
        PageId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A repository identifier (owner/repo format).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        RepoId {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parses an `owner/repo` string. Returns `None` if either part is
    /// missing or empty, or if there are extra path segments.
    pub fn parse(full_name: &str) -> Option<Self> {
        let mut parts = full_name.splitn(2, '/');
        let owner = parts.next()?;
        let repo = parts.next()?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }
        Some(RepoId::new(owner, repo))
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pr_number_display_has_hash_prefix() {
        assert_eq!(PrNumber(42).to_string(), "#42");
    }

    #[test]
    fn repo_id_parse_valid() {
        let repo = RepoId::parse("octocat/hello-world").unwrap();
        assert_eq!(repo.owner, "octocat");
        assert_eq!(repo.repo, "hello-world");
        assert_eq!(repo.full_name(), "octocat/hello-world");
    }

    #[test]
    fn repo_id_parse_invalid() {
        assert!(RepoId::parse("no-slash").is_none());
        assert!(RepoId::parse("/repo").is_none());
        assert!(RepoId::parse("owner/").is_none());
        assert!(RepoId::parse("a/b/c").is_none());
        assert!(RepoId::parse("").is_none());
    }
}
