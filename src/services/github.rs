//! GitHub code host adapter.
//!
//! Plain REST client scoped to the single configured repository. Supports two
//! authentication modes: a personal access token, or GitHub App credentials
//! exchanged for an installation token at startup.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{CodeHost, MergeError, ServiceError};
use crate::types::{ChangedFile, PrNumber, PullRequestSnapshot, RepoId};

const GITHUB_API: &str = "https://api.github.com";

/// GitHub authentication: exactly one mode is configured at startup.
#[derive(Debug, Clone)]
pub enum GitHubAuth {
    /// Personal access token.
    Token(String),
    /// GitHub App credentials; exchanged for an installation token.
    App { app_id: String, private_key: String },
}

pub struct GitHubClient {
    http: reqwest::Client,
    token: String,
    repo: RepoId,
    base_url: String,
}

impl GitHubClient {
    /// Creates a client for the given repository, performing the App
    /// token exchange if needed.
    pub async fn new(
        http: reqwest::Client,
        auth: GitHubAuth,
        repo: RepoId,
    ) -> Result<Self, ServiceError> {
        let token = match auth {
            GitHubAuth::Token(token) => token,
            GitHubAuth::App {
                app_id,
                private_key,
            } => installation_token(&http, GITHUB_API, &app_id, &private_key).await?,
        };
        Ok(GitHubClient {
            http,
            token,
            repo,
            base_url: GITHUB_API.to_string(),
        })
    }

    fn pulls_url(&self, number: PrNumber) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}",
            self.base_url, self.repo.owner, self.repo.repo, number.0
        )
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ServiceError::api("github", status.as_u16(), message))
    }
}

#[derive(Debug, Deserialize)]
struct RawPull {
    number: u64,
    title: String,
    #[serde(default)]
    body: Option<String>,
    user: RawUser,
    html_url: String,
    /// Null while GitHub is still computing mergeability.
    #[serde(default)]
    mergeable: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RawFile {
    filename: String,
    additions: u64,
    deletions: u64,
    status: String,
    #[serde(default)]
    patch: Option<String>,
}

#[async_trait]
impl CodeHost for GitHubClient {
    async fn pull_request_snapshot(
        &self,
        number: PrNumber,
    ) -> Result<PullRequestSnapshot, ServiceError> {
        let response = self
            .http
            .get(self.pulls_url(number))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let pull: RawPull = Self::check(response).await?.json().await?;

        let response = self
            .http
            .get(format!("{}/files?per_page=100", self.pulls_url(number)))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let raw_files: Vec<RawFile> = Self::check(response).await?.json().await?;

        let files = raw_files
            .into_iter()
            .map(|f| ChangedFile {
                filename: f.filename,
                additions: f.additions,
                deletions: f.deletions,
                status: f.status,
                patch: f.patch,
            })
            .collect();

        debug!(pr = %number, "fetched PR snapshot");
        Ok(PullRequestSnapshot::new(
            PrNumber(pull.number),
            pull.title,
            pull.body.unwrap_or_default(),
            pull.user.login,
            pull.html_url,
            self.repo.full_name(),
            files,
        ))
    }

    async fn merge_pull_request(&self, number: PrNumber) -> Result<(), MergeError> {
        // Re-fetch at call time: mergeability is the code host's judgment and
        // must not be cached from the opened event.
        let response = self
            .http
            .get(self.pulls_url(number))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(ServiceError::from)?;
        let pull: RawPull = Self::check(response)
            .await?
            .json()
            .await
            .map_err(ServiceError::from)?;

        if pull.mergeable != Some(true) {
            warn!(pr = %number, "PR reported not mergeable");
            return Err(MergeError::NotMergeable(number));
        }

        let response = self
            .http
            .put(format!("{}/merge", self.pulls_url(number)))
            .bearer_auth(&self.token)
            .json(&json!({
                "commit_message": format!("Merged PR {} via devflow-bot", number),
                "merge_method": "merge",
            }))
            .send()
            .await
            .map_err(ServiceError::from)?;

        let status = response.status();
        if status.is_success() {
            debug!(pr = %number, "merged PR");
            return Ok(());
        }
        // 405/409 mean the merge precondition failed between the check and
        // the merge call; surface that as NotMergeable, not transport.
        if status.as_u16() == 405 || status.as_u16() == 409 {
            return Err(MergeError::NotMergeable(number));
        }
        let message = response.text().await.unwrap_or_default();
        Err(ServiceError::api("github", status.as_u16(), message).into())
    }

    async fn post_comment(&self, number: PrNumber, body: &str) -> Result<(), ServiceError> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.base_url, self.repo.owner, self.repo.repo, number.0
        );
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&json!({ "body": body }))
            .send()
            .await?;
        Self::check(response).await?;
        debug!(pr = %number, "posted PR comment");
        Ok(())
    }
}

/// Exchanges GitHub App credentials for an installation access token.
///
/// Signs a short-lived RS256 JWT with the App's private key, picks the first
/// installation (the bot serves a single repository), and requests a token
/// for it.
async fn installation_token(
    http: &reqwest::Client,
    base_url: &str,
    app_id: &str,
    private_key: &str,
) -> Result<String, ServiceError> {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

    let now = chrono::Utc::now().timestamp();
    let claims = json!({ "iat": now - 60, "exp": now + 540, "iss": app_id });
    let key = EncodingKey::from_rsa_pem(private_key.as_bytes())
        .map_err(|e| ServiceError::Auth(format!("invalid App private key: {e}")))?;
    let jwt = encode(&Header::new(Algorithm::RS256), &claims, &key)
        .map_err(|e| ServiceError::Auth(format!("failed to sign App JWT: {e}")))?;

    #[derive(Deserialize)]
    struct Installation {
        id: u64,
    }
    let response = http
        .get(format!("{base_url}/app/installations"))
        .bearer_auth(&jwt)
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ServiceError::api("github", status.as_u16(), message));
    }
    let installations: Vec<Installation> = response.json().await?;
    let installation = installations
        .first()
        .ok_or_else(|| ServiceError::Auth("GitHub App has no installations".to_string()))?;

    #[derive(Deserialize)]
    struct AccessToken {
        token: String,
    }
    let response = http
        .post(format!(
            "{base_url}/app/installations/{}/access_tokens",
            installation.id
        ))
        .bearer_auth(&jwt)
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ServiceError::api("github", status.as_u16(), message));
    }
    let access: AccessToken = response.json().await?;
    Ok(access.token)
}
