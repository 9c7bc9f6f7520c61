pub mod config;
pub mod error;
pub mod routes_export;
pub mod routes_feedback;
pub mod routes_health;
pub mod routes_plan;
pub mod state;
mod store_exec;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::state::SharedState;

pub fn app(state: SharedState) -> Router {
    Router::new()
        .route("/", get(routes_health::root))
        .route("/api/generate-plan", post(routes_plan::generate_plan))
        .route("/api/submit-feedback", post(routes_feedback::submit_feedback))
        .route("/api/export-dataset/:session_id", get(routes_export::export_dataset))
        .route("/api/datasets", get(routes_export::list_datasets))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
