//! Notion task store adapter.
//!
//! Tasks live in a single Notion database. Lookup filters the database's
//! "Task ID" rich-text property for an exact match; updates write the
//! "Status" select property and optionally the "PR Link" url property.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{ServiceError, TaskStore};
use crate::types::{PageId, TaskId, TaskStatus};

const NOTION_API: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

pub struct NotionClient {
    http: reqwest::Client,
    token: String,
    database_id: String,
    base_url: String,
}

impl NotionClient {
    pub fn new(http: reqwest::Client, token: impl Into<String>, database_id: impl Into<String>) -> Self {
        NotionClient {
            http,
            token: token.into(),
            database_id: database_id.into(),
            base_url: NOTION_API.to_string(),
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ServiceError::api("notion", status.as_u16(), message))
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<QueryResult>,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    id: String,
}

#[async_trait]
impl TaskStore for NotionClient {
    async fn find_task(&self, task_id: &TaskId) -> Result<Option<PageId>, ServiceError> {
        let url = format!("{}/databases/{}/query", self.base_url, self.database_id);
        let body = json!({
            "filter": {
                "property": "Task ID",
                "rich_text": { "equals": task_id.as_str() }
            }
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await?;
        let query: QueryResponse = Self::check(response).await?.json().await?;

        let page = query.results.into_iter().next().map(|r| PageId(r.id));
        debug!(task = %task_id, found = page.is_some(), "task store lookup");
        Ok(page)
    }

    async fn update_task(
        &self,
        page_id: &PageId,
        status: TaskStatus,
        pr_link: Option<&str>,
    ) -> Result<(), ServiceError> {
        let url = format!("{}/pages/{}", self.base_url, page_id.as_str());
        let mut properties = json!({
            "Status": { "select": { "name": status.as_str() } }
        });
        if let Some(link) = pr_link {
            properties["PR Link"] = json!({ "url": link });
        }

        let response = self
            .http
            .patch(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&json!({ "properties": properties }))
            .send()
            .await?;
        Self::check(response).await?;

        debug!(page = %page_id, status = %status, "task store update");
        Ok(())
    }
}
