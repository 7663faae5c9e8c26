use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::Evaluator;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum
/// extractors. This is the only session-scoped state; there are no globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Store,
    /// The one outbound seam. Production: `OpenRouterClient`. Tests: a stub.
    pub evaluator: Arc<dyn Evaluator>,
}
