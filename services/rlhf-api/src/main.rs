use std::sync::Arc;

use anyhow::{Context, Result};
use invoker::OpenAiCompatProvider;
use rlhf::FileStore;
use tracing::info;

use rlhf_api::config::AppConfig;
use rlhf_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cfg = AppConfig::from_env()?;

    let provider = OpenAiCompatProvider::new(
        cfg.model_api_url.clone(),
        Some(cfg.api_key.clone()),
        cfg.model_id.clone(),
        cfg.model_timeout,
    )
    .context("Failed to build model client")?;

    let store = FileStore::new(&cfg.training_data_dir)
        .with_context(|| format!("Failed to open training data dir {}", cfg.training_data_dir))?;
    info!(dir = %cfg.training_data_dir, "dataset store ready");

    let state = Arc::new(AppState::new(Arc::new(provider), Arc::new(store), cfg.model_id.clone()));
    let app = rlhf_api::app(state);

    let addr = &cfg.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(model = %cfg.model_id, "rlhf-api listening on http://{addr}");
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
