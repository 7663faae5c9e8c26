pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::evaluation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interactive surface
        .route(
            "/",
            get(handlers::handle_show_form).post(handlers::handle_submit),
        )
        // JSON mirror of the same pipeline, for programmatic use
        .route("/api/v1/evaluate", post(handlers::handle_evaluate))
        .with_state(state)
}
