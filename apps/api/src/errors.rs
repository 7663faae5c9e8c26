#![allow(dead_code)]

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type for the JSON API surface.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// The HTML form handlers render errors inline instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, raw) = match &self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
            }
            AppError::Llm(err) => {
                tracing::error!("LLM error: {err}");
                let raw = err.raw_body();
                let (status, code) = match err {
                    LlmError::MissingCredential => {
                        (StatusCode::UNAUTHORIZED, "MISSING_CREDENTIAL")
                    }
                    LlmError::Auth { .. } => (StatusCode::UNAUTHORIZED, "AUTH_ERROR"),
                    LlmError::Network(_) => (StatusCode::BAD_GATEWAY, "NETWORK_ERROR"),
                    LlmError::Api { .. } => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
                    LlmError::MalformedResponse { .. } => {
                        (StatusCode::BAD_GATEWAY, "MALFORMED_RESPONSE")
                    }
                    LlmError::EmptyContent { .. } => (StatusCode::BAD_GATEWAY, "EMPTY_CONTENT"),
                };
                (status, code, err.to_string(), raw)
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(raw) = raw {
            error["raw"] = Value::String(raw);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
