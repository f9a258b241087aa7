//! Slack messenger adapter.
//!
//! Posts the interactive review request built by the core and updates
//! previously posted messages. Slack reports API failures inside a 200
//! response (`"ok": false`), so both layers are checked.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{Messenger, ServiceError};
use crate::workflow::notify::ReviewRequest;

const SLACK_API: &str = "https://slack.com/api";

pub struct SlackClient {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

impl SlackClient {
    pub fn new(http: reqwest::Client, token: impl Into<String>) -> Self {
        SlackClient {
            http,
            token: token.into(),
            base_url: SLACK_API.to_string(),
        }
    }

    async fn call(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<SlackResponse, ServiceError> {
        let response = self
            .http
            .post(format!("{}/{}", self.base_url, method))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::api("slack", status.as_u16(), message));
        }
        let parsed: SlackResponse = response.json().await?;
        if !parsed.ok {
            return Err(ServiceError::api(
                "slack",
                status.as_u16(),
                parsed.error.clone().unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        Ok(parsed)
    }
}

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl Messenger for SlackClient {
    async fn post_review_request(
        &self,
        channel: &str,
        request: &ReviewRequest,
    ) -> Result<String, ServiceError> {
        let response = self
            .call(
                "chat.postMessage",
                json!({
                    "channel": channel,
                    "text": request.text,
                    "blocks": request.blocks,
                }),
            )
            .await?;
        debug!(channel, "posted review request");
        Ok(response.ts.unwrap_or_default())
    }

    async fn update_message(
        &self,
        channel: &str,
        ts: &str,
        text: &str,
    ) -> Result<(), ServiceError> {
        self.call(
            "chat.update",
            json!({ "channel": channel, "ts": ts, "text": text }),
        )
        .await?;
        Ok(())
    }
}
