//! Axum route handlers for the evaluation pipeline:
//! validate → build prompt → one LLM call → persist → render.

use axum::{extract::State, response::Html, Form, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::evaluation::page::{self, FormValues, Outcome};
use crate::llm_client::{
    resolve_api_key, EvaluationRequest, LlmError, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};
use crate::state::AppState;
use crate::store::SavedState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EvaluateForm {
    #[serde(default)]
    pub resume: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub misc_criteria: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequestBody {
    #[serde(default)]
    pub resume: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub misc_criteria: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub content: String,
    pub raw: Value,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
///
/// Renders the form, prefilled from the persistence store.
pub async fn handle_show_form(State(state): State<AppState>) -> Html<String> {
    let saved = state.store.load();
    Html(page::render_page(&FormValues::from_saved(&saved), None, None))
}

/// POST /
///
/// The one trigger action. Validates, calls the evaluator, persists the
/// three form fields, and re-renders the page with the outcome inline.
/// Nothing here is fatal; the user corrects input and submits again.
pub async fn handle_submit(
    State(state): State<AppState>,
    Form(form): Form<EvaluateForm>,
) -> Html<String> {
    let saved = state.store.load();

    let values = FormValues {
        resume: form.resume.clone(),
        job_description: form.job_description.clone(),
        misc_criteria: form.misc_criteria.clone(),
        api_key: form.api_key.clone(),
        model: effective_model(&form.model),
        temperature: form.temperature.unwrap_or(DEFAULT_TEMPERATURE),
    };

    if form.resume.trim().is_empty() {
        return rejected(&values, "Please paste your resume.");
    }
    if form.job_description.trim().is_empty() {
        return rejected(&values, "Please paste the job description.");
    }
    let Some(api_key) = resolve_api_key(
        &form.api_key,
        &saved.api_key,
        state.config.openrouter_api_key.as_deref(),
    ) else {
        return rejected(
            &values,
            "Please enter your OpenRouter API key (or set OPENROUTER_API_KEY).",
        );
    };

    let request = EvaluationRequest {
        resume: form.resume.clone(),
        job_description: form.job_description.clone(),
        misc_criteria: form.misc_criteria.clone(),
        model: values.model.clone(),
        temperature: values.temperature,
    };

    info!("Running evaluation (model: {})", request.model);
    let result = state.evaluator.evaluate(&request, &api_key).await;

    // Persist whether or not the call succeeded, matching the tool's
    // long-standing behavior: typed input is never lost to an API error.
    let save_warning = persist_fields(&state, &form.resume, &form.misc_criteria, &form.api_key);

    let outcome = match result {
        Ok(evaluation) => Outcome::Success {
            raw_pretty: pretty_raw(&evaluation.raw),
            content: evaluation.content,
        },
        Err(err) => {
            warn!("Evaluation failed: {err}");
            Outcome::Failure {
                message: err.to_string(),
                raw_pretty: err.raw_body(),
            }
        }
    };

    Html(page::render_page(&values, Some(&outcome), save_warning.as_deref()))
}

/// POST /api/v1/evaluate
///
/// JSON mirror of the form pipeline. Same validation, same single call,
/// same persistence; errors map to the `{error: {code, message}}` envelope.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequestBody>,
) -> Result<Json<EvaluateResponse>, AppError> {
    if request.resume.trim().is_empty() {
        return Err(AppError::Validation("resume cannot be empty".to_string()));
    }
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let saved = state.store.load();
    let api_key = resolve_api_key(
        &request.api_key,
        &saved.api_key,
        state.config.openrouter_api_key.as_deref(),
    )
    .ok_or(AppError::Llm(LlmError::MissingCredential))?;

    let eval_request = EvaluationRequest {
        resume: request.resume.clone(),
        job_description: request.job_description.clone(),
        misc_criteria: request.misc_criteria.clone(),
        model: effective_model(request.model.as_deref().unwrap_or("")),
        temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
    };

    let result = state.evaluator.evaluate(&eval_request, &api_key).await;

    // A request that authenticated via the stored key must not wipe it;
    // the env fallback is never written to disk.
    let persist_key = if request.api_key.trim().is_empty() {
        saved.api_key.as_str()
    } else {
        request.api_key.as_str()
    };
    if let Some(warning) =
        persist_fields(&state, &request.resume, &request.misc_criteria, persist_key)
    {
        warn!("{warning}");
    }

    let evaluation = result?;
    Ok(Json(EvaluateResponse {
        content: evaluation.content,
        raw: evaluation.raw,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn effective_model(model: &str) -> String {
    let model = model.trim();
    if model.is_empty() {
        DEFAULT_MODEL.to_string()
    } else {
        model.to_string()
    }
}

fn rejected(values: &FormValues, message: &str) -> Html<String> {
    Html(page::render_page(
        values,
        Some(&Outcome::rejected(message)),
        None,
    ))
}

fn pretty_raw(raw: &Value) -> String {
    serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string())
}

/// Saves the three persisted fields. A failed save is an inline warning,
/// never an error: the in-memory session is unaffected.
fn persist_fields(
    state: &AppState,
    resume: &str,
    misc_criteria: &str,
    api_key: &str,
) -> Option<String> {
    let new_state = SavedState {
        resume_text: resume.to_string(),
        misc_criteria: misc_criteria.to_string(),
        api_key: api_key.trim().to_string(),
    };
    match state.store.save(&new_state) {
        Ok(()) => None,
        Err(e) => {
            warn!("Failed to persist form state: {e:#}");
            Some(format!("Could not save your inputs: {e}"))
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
