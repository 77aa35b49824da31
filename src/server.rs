use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use thiserror::Error;
use tower_http::services::ServeDir;

use crate::config::{Config, API_KEY_ENV};
use crate::llm::{CompletionError, OpenAiClient, TextCompletion};

/// Fixed instruction the proxy attaches to every upstream call.
pub const SYSTEM_MESSAGE: &str = "You improve user writing concisely and professionally.";
pub const TEMPERATURE: f32 = 0.4;

/// Shared handler state. `backend` is `None` when no API key was configured;
/// the missing credential then surfaces as a 500 on each request rather than
/// stopping the server from starting.
#[derive(Clone)]
pub struct AppState {
    backend: Option<Arc<dyn TextCompletion>>,
}

impl AppState {
    pub fn new(backend: Option<Arc<dyn TextCompletion>>) -> Self {
        Self { backend }
    }

    pub fn from_config(config: &Config) -> Self {
        let backend = config.api_key.as_ref().map(|key| {
            Arc::new(OpenAiClient::new(key, &config.model, &config.base_url))
                as Arc<dyn TextCompletion>
        });
        Self { backend }
    }
}

#[derive(Debug, Deserialize)]
pub struct RewriteRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Everything a rewrite request can fail with, mapped to the plain-text
/// HTTP responses the form displays inline.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("Missing prompt")]
    MissingPrompt,
    #[error("Missing OPENAI_API_KEY")]
    MissingApiKey,
    /// Upstream non-success body, relayed untouched.
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Internal(String),
}

impl From<CompletionError> for RewriteError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::Upstream { body } => RewriteError::Upstream(body),
            other => RewriteError::Internal(internal_message(other.to_string())),
        }
    }
}

/// An internal failure that renders without a message still needs a body.
fn internal_message(message: String) -> String {
    if message.is_empty() {
        "Server error".to_string()
    } else {
        message
    }
}

impl IntoResponse for RewriteError {
    fn into_response(self) -> Response {
        let status = match self {
            RewriteError::MissingPrompt => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

/// POST /api/rewrite — forwards the prompt to the completion endpoint and
/// relays the rewritten text. One upstream call, no retries; a client that
/// aborts mid-flight does not cancel the upstream call.
pub async fn rewrite(
    State(state): State<AppState>,
    Json(request): Json<RewriteRequest>,
) -> Result<String, RewriteError> {
    // Only an absent or empty-string prompt is refused; whitespace is
    // forwarded as-is. Trimming belongs to the prompt builder.
    let prompt = request
        .prompt
        .filter(|p| !p.is_empty())
        .ok_or(RewriteError::MissingPrompt)?;

    let backend = state.backend.as_ref().ok_or_else(|| {
        tracing::warn!("rewrite request refused: {API_KEY_ENV} is not configured");
        RewriteError::MissingApiKey
    })?;

    tracing::debug!(prompt_len = prompt.len(), "forwarding rewrite request");
    let text = backend
        .complete(&prompt, SYSTEM_MESSAGE, TEMPERATURE)
        .await
        .map_err(|err| {
            tracing::warn!(error = %err, "upstream completion failed");
            RewriteError::from(err)
        })?;

    Ok(text)
}

async fn health_check() -> &'static str {
    "OK"
}

pub fn router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/api/rewrite", post(rewrite))
        .route("/health", get(health_check))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
}

/// Binds the listener and serves until the process exits.
pub async fn serve(bind: &str, config: Config) -> Result<()> {
    if config.api_key.is_none() {
        tracing::warn!("{API_KEY_ENV} is not set; rewrite requests will fail");
    }

    let state = AppState::from_config(&config);
    let app = router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::to_bytes;

    struct FixedBackend(&'static str);

    #[async_trait]
    impl TextCompletion for FixedBackend {
        async fn complete(
            &self,
            _prompt: &str,
            _system: &str,
            _temperature: f32,
        ) -> Result<String, CompletionError> {
            Ok(self.0.trim().to_string())
        }
    }

    struct FailingBackend(fn() -> CompletionError);

    #[async_trait]
    impl TextCompletion for FailingBackend {
        async fn complete(
            &self,
            _prompt: &str,
            _system: &str,
            _temperature: f32,
        ) -> Result<String, CompletionError> {
            Err((self.0)())
        }
    }

    fn state_with(backend: impl TextCompletion + 'static) -> AppState {
        AppState::new(Some(Arc::new(backend)))
    }

    fn request(prompt: Option<&str>) -> Json<RewriteRequest> {
        Json(RewriteRequest {
            prompt: prompt.map(str::to_string),
        })
    }

    async fn body_of(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn returns_the_backend_text() {
        let state = state_with(FixedBackend(" Hi there! "));
        let text = rewrite(State(state), request(Some("Hello")))
            .await
            .unwrap();
        assert_eq!(text, "Hi there!");
    }

    #[tokio::test]
    async fn missing_prompt_is_a_400() {
        let state = state_with(FixedBackend("unused"));
        let err = rewrite(State(state), request(None)).await.unwrap_err();

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(response).await, "Missing prompt");
    }

    #[tokio::test]
    async fn empty_prompt_counts_as_missing() {
        let state = state_with(FixedBackend("unused"));
        let err = rewrite(State(state), request(Some(""))).await.unwrap_err();
        assert!(matches!(err, RewriteError::MissingPrompt));
    }

    #[tokio::test]
    async fn whitespace_prompt_is_forwarded() {
        let state = state_with(FixedBackend("ok"));
        let text = rewrite(State(state), request(Some("   "))).await.unwrap();
        assert_eq!(text, "ok");
    }

    #[tokio::test]
    async fn missing_credential_is_a_500_without_an_upstream_call() {
        let state = AppState::new(None);
        let err = rewrite(State(state), request(Some("Hello")))
            .await
            .unwrap_err();

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await, "Missing OPENAI_API_KEY");
    }

    #[tokio::test]
    async fn upstream_failure_body_is_relayed_verbatim() {
        let state = state_with(FailingBackend(|| CompletionError::Upstream {
            body: "{\"error\":\"insufficient_quota\"}".to_string(),
        }));
        let err = rewrite(State(state), request(Some("Hello")))
            .await
            .unwrap_err();

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await, "{\"error\":\"insufficient_quota\"}");
    }

    #[tokio::test]
    async fn parse_failure_returns_the_error_message() {
        let state = state_with(FailingBackend(|| {
            CompletionError::InvalidResponse("error decoding response body".to_string())
        }));
        let err = rewrite(State(state), request(Some("Hello")))
            .await
            .unwrap_err();

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_of(response).await,
            "Invalid response from model: error decoding response body"
        );
    }

    #[test]
    fn empty_error_message_falls_back_to_server_error() {
        assert_eq!(internal_message(String::new()), "Server error");
        assert_eq!(internal_message("boom".to_string()), "boom");
    }
}
