use std::sync::Arc;

use invoker::ChatProvider;
use rlhf::DatasetStore;

pub type SharedState = Arc<AppState>;

/// Per-process collaborators. Nothing in here is mutated by requests.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ChatProvider>,
    pub store: Arc<dyn DatasetStore>,
    pub model: String,
    pub system_prompt: String,
}

impl AppState {
    pub fn new(provider: Arc<dyn ChatProvider>, store: Arc<dyn DatasetStore>, model: String) -> Self {
        Self {
            provider,
            store,
            model,
            system_prompt: crate::config::SYSTEM_PROMPT.to_string(),
        }
    }
}
