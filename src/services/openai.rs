//! OpenAI summarizer adapter.
//!
//! Sends the review prompt built by the core to the chat completions API and
//! returns the model's text. Treated as a black box with best-effort output;
//! the workflow degrades to a fallback string when this adapter fails.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{ServiceError, Summarizer};
use crate::types::PullRequestSnapshot;
use crate::workflow::summary::build_review_prompt;

const OPENAI_API: &str = "https://api.openai.com/v1";
const MODEL: &str = "gpt-4o";

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        OpenAiClient {
            http,
            api_key: api_key.into(),
            base_url: OPENAI_API.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[async_trait]
impl Summarizer for OpenAiClient {
    async fn summarize(&self, snapshot: &PullRequestSnapshot) -> Result<String, ServiceError> {
        let prompt = build_review_prompt(snapshot);
        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": MODEL,
                "temperature": 0,
                "messages": [{ "role": "user", "content": prompt }],
            }))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::api("openai", status.as_u16(), message));
        }
        let completion: CompletionResponse = response.json().await?;
        let summary = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ServiceError::api("openai", 200, "empty choices array"))?;
        debug!(pr = %snapshot.number, "generated AI review");
        Ok(summary)
    }
}
