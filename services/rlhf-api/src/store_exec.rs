use std::sync::Arc;

use rlhf::DatasetStore;

/// Run a blocking store operation off the async runtime.
pub async fn with_store_blocking<R, F>(
    store: Arc<dyn DatasetStore>,
    f: F,
) -> Result<R, tokio::task::JoinError>
where
    R: Send + 'static,
    F: FnOnce(&dyn DatasetStore) -> R + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(store.as_ref())).await
}
