use axum::Json;
use serde_json::{json, Value};

pub const SERVICE_NAME: &str = "PDDL RLHF API";
pub const SERVICE_VERSION: &str = "1.0.0";

pub async fn root() -> Json<Value> {
    Json(json!({
        "status": "online",
        "service": SERVICE_NAME,
        "version": SERVICE_VERSION,
    }))
}
