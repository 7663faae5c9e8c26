//! LLM Client — the single point of entry for the one outbound HTTP call
//! this tool makes: a chat-completions POST to OpenRouter.
//!
//! One attempt per submission. No retry, no backoff, no circuit breaker:
//! the user corrects input and presses the button again.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "openrouter/sonoma-dusk-alpha";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("No API key available. Enter one in the form or set OPENROUTER_API_KEY.")]
    MissingCredential,

    #[error("Authentication failed (status {status}). Check your API key.")]
    Auth { status: u16, body: String },

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to parse API response as JSON.")]
    MalformedResponse { body: String },

    #[error("Empty response from model.")]
    EmptyContent { raw: Value },
}

impl LlmError {
    /// The unparsed upstream payload, when one was received. Kept around
    /// so the raw-response view works even for failed calls.
    pub fn raw_body(&self) -> Option<String> {
        match self {
            LlmError::Auth { body, .. }
            | LlmError::Api { body, .. }
            | LlmError::MalformedResponse { body } => Some(body.clone()),
            LlmError::EmptyContent { raw } => serde_json::to_string_pretty(raw).ok(),
            LlmError::MissingCredential | LlmError::Network(_) => None,
        }
    }
}

/// One evaluation request. Constructed fresh per button press; never persisted.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub resume: String,
    pub job_description: String,
    pub misc_criteria: String,
    pub model: String,
    pub temperature: f32,
}

/// The model's markdown answer plus the full unparsed payload for inspection.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub content: String,
    pub raw: Value,
}

/// Seam between the handlers and the remote endpoint. Carried in
/// `AppState` as `Arc<dyn Evaluator>`; tests swap in a stub.
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(
        &self,
        request: &EvaluationRequest,
        api_key: &str,
    ) -> Result<Evaluation, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (OpenAI-style chat completions, as served by OpenRouter)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

// ────────────────────────────────────────────────────────────────────────────
// OpenRouter client
// ────────────────────────────────────────────────────────────────────────────

pub struct OpenRouterClient {
    client: Client,
    api_url: String,
}

impl OpenRouterClient {
    pub fn new() -> Self {
        Self::with_api_url(OPENROUTER_API_URL.to_string())
    }

    /// The endpoint override exists so tests can point at a local listener.
    pub fn with_api_url(api_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_url,
        }
    }
}

impl Default for OpenRouterClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Evaluator for OpenRouterClient {
    async fn evaluate(
        &self,
        request: &EvaluationRequest,
        api_key: &str,
    ) -> Result<Evaluation, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingCredential);
        }

        let user_message = prompts::build_user_message(
            &request.resume,
            &request.job_description,
            &request.misc_criteria,
        );

        let body = ChatCompletionRequest {
            model: &request.model,
            temperature: request.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompts::SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_message,
                },
            ],
        };

        debug!(
            "Calling {} (model: {}, temperature: {})",
            self.api_url, request.model, request.temperature
        );

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(LlmError::Auth {
                status: status.as_u16(),
                body: text,
            });
        }
        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_evaluation(&text)
    }
}

/// Extracts the model's answer from a chat-completions payload, keeping the
/// full parsed payload alongside it.
pub(crate) fn parse_evaluation(body: &str) -> Result<Evaluation, LlmError> {
    let raw: Value = serde_json::from_str(body).map_err(|_| LlmError::MalformedResponse {
        body: body.to_string(),
    })?;

    let content = raw
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .unwrap_or("");

    if content.is_empty() {
        return Err(LlmError::EmptyContent { raw });
    }

    Ok(Evaluation {
        content: content.to_string(),
        raw,
    })
}

/// Credential precedence: the form value wins over the persisted value,
/// which wins over the `OPENROUTER_API_KEY` environment fallback.
pub fn resolve_api_key(
    form_key: &str,
    saved_key: &str,
    env_key: Option<&str>,
) -> Option<String> {
    [form_key, saved_key]
        .iter()
        .map(|key| key.trim())
        .chain(env_key.map(str::trim))
        .find(|key| !key.is_empty())
        .map(str::to_string)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::Router;

    const GOOD_BODY: &str = r#"{"choices":[{"message":{"content":"Score: 7/10..."}}]}"#;

    fn sample_request() -> EvaluationRequest {
        EvaluationRequest {
            resume: "Senior backend engineer, 8 years Go and distributed systems".to_string(),
            job_description: "Looking for a Staff SRE with Kubernetes experience".to_string(),
            misc_criteria: "remote-only, $180k+".to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Serves one fixed status/body on POST /, on an ephemeral port.
    async fn spawn_upstream(status: StatusCode, body: &'static str) -> String {
        let app = Router::new().route("/", post(move || async move { (status, body) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }

    #[test]
    fn test_parse_evaluation_extracts_content() {
        let evaluation = parse_evaluation(GOOD_BODY).unwrap();
        assert_eq!(evaluation.content, "Score: 7/10...");
        assert!(evaluation.raw.get("choices").is_some());
    }

    #[test]
    fn test_parse_evaluation_non_json_keeps_body() {
        let err = parse_evaluation("<html>gateway timeout</html>").unwrap_err();
        match err {
            LlmError::MalformedResponse { body } => {
                assert_eq!(body, "<html>gateway timeout</html>")
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_evaluation_missing_content_is_empty() {
        let err = parse_evaluation(r#"{"choices":[]}"#).unwrap_err();
        match err {
            LlmError::EmptyContent { raw } => assert!(raw.get("choices").is_some()),
            other => panic!("expected EmptyContent, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_api_key_form_wins() {
        let key = resolve_api_key("from-form", "from-store", Some("from-env"));
        assert_eq!(key.as_deref(), Some("from-form"));
    }

    #[test]
    fn test_resolve_api_key_falls_back_to_store_then_env() {
        assert_eq!(
            resolve_api_key("", "from-store", Some("from-env")).as_deref(),
            Some("from-store")
        );
        assert_eq!(
            resolve_api_key("  ", "", Some("from-env")).as_deref(),
            Some("from-env")
        );
        assert_eq!(resolve_api_key("", "", None), None);
    }

    #[tokio::test]
    async fn test_evaluate_without_key_is_missing_credential() {
        let client = OpenRouterClient::new();
        let err = client.evaluate(&sample_request(), "  ").await.unwrap_err();
        assert!(matches!(err, LlmError::MissingCredential));
    }

    #[tokio::test]
    async fn test_evaluate_success_returns_content_and_raw() {
        let url = spawn_upstream(StatusCode::OK, GOOD_BODY).await;
        let client = OpenRouterClient::with_api_url(url);

        let evaluation = client.evaluate(&sample_request(), "sk-or-test").await.unwrap();
        assert_eq!(evaluation.content, "Score: 7/10...");
    }

    #[tokio::test]
    async fn test_evaluate_401_surfaces_auth_error() {
        let url = spawn_upstream(StatusCode::UNAUTHORIZED, r#"{"error":"bad key"}"#).await;
        let client = OpenRouterClient::with_api_url(url);

        let err = client.evaluate(&sample_request(), "sk-or-test").await.unwrap_err();
        match err {
            LlmError::Auth { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("bad key"));
            }
            other => panic!("expected Auth, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_evaluate_500_surfaces_api_error() {
        let url = spawn_upstream(StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").await;
        let client = OpenRouterClient::with_api_url(url);

        let err = client.evaluate(&sample_request(), "sk-or-test").await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_evaluate_connection_failure_is_network_error() {
        // Bind and immediately drop a listener so the port is closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = OpenRouterClient::with_api_url(format!("http://{addr}/"));

        let err = client.evaluate(&sample_request(), "sk-or-test").await.unwrap_err();
        assert!(matches!(err, LlmError::Network(_)));
        assert!(err.raw_body().is_none());
    }

    #[tokio::test]
    async fn test_evaluate_non_json_body_keeps_raw_for_inspection() {
        let url = spawn_upstream(StatusCode::OK, "definitely not json").await;
        let client = OpenRouterClient::with_api_url(url);

        let err = client.evaluate(&sample_request(), "sk-or-test").await.unwrap_err();
        assert_eq!(err.raw_body().as_deref(), Some("definitely not json"));
    }
}
