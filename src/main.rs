use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devflow_bot::config::Config;
use devflow_bot::server::{build_router, AppState};
use devflow_bot::services::{self, GitHubClient, NotionClient, OpenAiClient, SlackClient};
use devflow_bot::workflow::ServiceContext;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devflow_bot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configuration is validated once; an incomplete environment is fatal.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(error = %error, "configuration invalid, refusing to start");
            return ExitCode::FAILURE;
        }
    };

    let http = match services::http_client() {
        Ok(http) => http,
        Err(error) => {
            tracing::error!(error = %error, "failed to build HTTP client");
            return ExitCode::FAILURE;
        }
    };

    let code_host =
        match GitHubClient::new(http.clone(), config.github_auth.clone(), config.repository.clone())
            .await
        {
            Ok(client) => client,
            Err(error) => {
                tracing::error!(error = %error, "GitHub authentication failed");
                return ExitCode::FAILURE;
            }
        };

    let ctx = ServiceContext {
        task_store: Arc::new(NotionClient::new(
            http.clone(),
            config.notion_token.clone(),
            config.notion_database_id.clone(),
        )),
        code_host: Arc::new(code_host),
        messenger: Arc::new(SlackClient::new(http.clone(), config.slack_token.clone())),
        summarizer: Arc::new(OpenAiClient::new(http, config.openai_api_key.clone())),
        default_channel: config.default_channel.clone(),
        repository: config.repository.clone(),
    };
    let state = AppState::new(ctx, config.webhook_secret.as_bytes());

    let app = build_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, repository = %config.repository, "devflow-bot listening");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(error = %error, %addr, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    if let Err(error) = axum::serve(listener, app).await {
        tracing::error!(error = %error, "server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
