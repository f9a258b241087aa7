//! Recording mock adapters shared by workflow and server tests.
//!
//! Each mock records its calls so tests can assert call counts and arguments
//! (the gating-order and best-effort properties are all about which adapter
//! calls happened). Failure injection is per-concern via `fail_*` switches.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::services::{CodeHost, MergeError, Messenger, ServiceError, Summarizer, TaskStore};
use crate::types::{
    ChangedFile, PageId, PrNumber, PullRequestSnapshot, RepoId, TaskId, TaskStatus,
};
use crate::workflow::notify::ReviewRequest;
use crate::workflow::ServiceContext;

fn injected(service: &'static str) -> ServiceError {
    ServiceError::Api {
        service,
        status: 500,
        message: "injected failure".to_string(),
    }
}

/// A snapshot with a small deterministic file list, for tests.
pub fn sample_snapshot(number: PrNumber) -> PullRequestSnapshot {
    PullRequestSnapshot::new(
        number,
        "Fix parser",
        "Fixes bug.\nNotion Task: TASK-042",
        "octocat",
        format!("https://github.com/org/repo/pull/{}", number.0),
        "org/repo",
        vec![
            ChangedFile {
                filename: "src/parser.rs".to_string(),
                additions: 10,
                deletions: 3,
                status: "modified".to_string(),
                patch: Some("@@ -1 +1 @@".to_string()),
            },
            ChangedFile {
                filename: "tests/parser.rs".to_string(),
                additions: 20,
                deletions: 0,
                status: "added".to_string(),
                patch: None,
            },
        ],
    )
}

#[derive(Default)]
pub struct MockTaskStore {
    tasks: Mutex<HashMap<String, String>>,
    lookup_calls: AtomicUsize,
    updates: Mutex<Vec<(PageId, TaskStatus, Option<String>)>>,
    fail_lookups: AtomicBool,
    fail_updates: AtomicBool,
}

impl MockTaskStore {
    pub fn insert_task(&self, task_id: &str, page_id: &str) {
        self.tasks
            .lock()
            .unwrap()
            .insert(task_id.to_string(), page_id.to_string());
    }

    pub fn fail_lookups(&self) {
        self.fail_lookups.store(true, Ordering::SeqCst);
    }

    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> Vec<(PageId, TaskStatus, Option<String>)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskStore for MockTaskStore {
    async fn find_task(&self, task_id: &TaskId) -> Result<Option<PageId>, ServiceError> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(injected("task-store"));
        }
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .get(task_id.as_str())
            .map(|id| PageId::new(id.clone())))
    }

    async fn update_task(
        &self,
        page_id: &PageId,
        status: TaskStatus,
        pr_link: Option<&str>,
    ) -> Result<(), ServiceError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(injected("task-store"));
        }
        self.updates
            .lock()
            .unwrap()
            .push((page_id.clone(), status, pr_link.map(String::from)));
        Ok(())
    }
}

pub struct MockCodeHost {
    mergeable: AtomicBool,
    merge_calls: AtomicUsize,
    snapshot_calls: AtomicUsize,
    comments: Mutex<Vec<String>>,
    fail_snapshots: AtomicBool,
    fail_comments: AtomicBool,
    fail_merges: AtomicBool,
}

impl Default for MockCodeHost {
    fn default() -> Self {
        MockCodeHost {
            mergeable: AtomicBool::new(true),
            merge_calls: AtomicUsize::new(0),
            snapshot_calls: AtomicUsize::new(0),
            comments: Mutex::new(Vec::new()),
            fail_snapshots: AtomicBool::new(false),
            fail_comments: AtomicBool::new(false),
            fail_merges: AtomicBool::new(false),
        }
    }
}

impl MockCodeHost {
    pub fn set_mergeable(&self, mergeable: bool) {
        self.mergeable.store(mergeable, Ordering::SeqCst);
    }

    pub fn fail_snapshots(&self) {
        self.fail_snapshots.store(true, Ordering::SeqCst);
    }

    pub fn fail_comments(&self) {
        self.fail_comments.store(true, Ordering::SeqCst);
    }

    pub fn fail_merges(&self) {
        self.fail_merges.store(true, Ordering::SeqCst);
    }

    pub fn merge_calls(&self) -> usize {
        self.merge_calls.load(Ordering::SeqCst)
    }

    pub fn snapshot_calls(&self) -> usize {
        self.snapshot_calls.load(Ordering::SeqCst)
    }

    pub fn comments(&self) -> Vec<String> {
        self.comments.lock().unwrap().clone()
    }
}

#[async_trait]
impl CodeHost for MockCodeHost {
    async fn pull_request_snapshot(
        &self,
        number: PrNumber,
    ) -> Result<PullRequestSnapshot, ServiceError> {
        self.snapshot_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_snapshots.load(Ordering::SeqCst) {
            return Err(injected("code-host"));
        }
        Ok(sample_snapshot(number))
    }

    async fn merge_pull_request(&self, number: PrNumber) -> Result<(), MergeError> {
        self.merge_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_merges.load(Ordering::SeqCst) {
            return Err(injected("code-host").into());
        }
        if !self.mergeable.load(Ordering::SeqCst) {
            return Err(MergeError::NotMergeable(number));
        }
        // A merged PR is no longer mergeable; the second attempt fails.
        self.mergeable.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn post_comment(&self, _number: PrNumber, body: &str) -> Result<(), ServiceError> {
        if self.fail_comments.load(Ordering::SeqCst) {
            return Err(injected("code-host"));
        }
        self.comments.lock().unwrap().push(body.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockMessenger {
    sent: Mutex<Vec<(String, ReviewRequest)>>,
    fail_sends: AtomicBool,
}

impl MockMessenger {
    pub fn fail_sends(&self) {
        self.fail_sends.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(String, ReviewRequest)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn post_review_request(
        &self,
        channel: &str,
        request: &ReviewRequest,
    ) -> Result<String, ServiceError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(injected("messenger"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((channel.to_string(), request.clone()));
        Ok("1234567890.123456".to_string())
    }

    async fn update_message(
        &self,
        _channel: &str,
        _ts: &str,
        _text: &str,
    ) -> Result<(), ServiceError> {
        Ok(())
    }
}

pub struct MockSummarizer {
    summary: String,
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl Default for MockSummarizer {
    fn default() -> Self {
        MockSummarizer {
            summary: "This PR fixes the parser bug with low complexity.".to_string(),
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }
}

impl MockSummarizer {
    pub fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn canned_summary(&self) -> String {
        self.summary.clone()
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, _snapshot: &PullRequestSnapshot) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.swap(false, Ordering::SeqCst) {
            return Err(injected("summarizer"));
        }
        Ok(self.summary.clone())
    }
}

/// One of each mock, shareable with a [`ServiceContext`] via `test_context`.
#[derive(Default)]
pub struct MockServices {
    pub task_store: Arc<MockTaskStore>,
    pub code_host: Arc<MockCodeHost>,
    pub messenger: Arc<MockMessenger>,
    pub summarizer: Arc<MockSummarizer>,
}

/// Builds a service context backed by the given mocks.
pub fn test_context(mocks: &MockServices) -> ServiceContext {
    ServiceContext {
        task_store: mocks.task_store.clone(),
        code_host: mocks.code_host.clone(),
        messenger: mocks.messenger.clone(),
        summarizer: mocks.summarizer.clone(),
        default_channel: "#pr-reviews".to_string(),
        repository: RepoId::new("org", "repo"),
    }
}
