//! Core domain types.
//!
//! This module contains the identifier newtypes, the pull request snapshot
//! value object, and the shared workflow result contract.

pub mod ids;
pub mod pr;
pub mod workflow;

pub use ids::{PageId, PrNumber, RepoId, TaskId};
pub use pr::{ChangedFile, PullRequestSnapshot};
pub use workflow::{TaskStatus, WorkflowResult, WorkflowStatus};
