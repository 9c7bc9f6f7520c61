use axum::extract::rejection::QueryRejection;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use rlhf::StoreError;
use serde_json::{json, Value};
use tracing::warn;

use crate::error::{ApiErr, ApiError};
use crate::state::SharedState;
use crate::store_exec::with_store_blocking;
use crate::types::{ExportFormat, ExportQuery};

fn store_error(e: StoreError) -> ApiError {
    match e {
        StoreError::InvalidSessionId(_) => ApiError::Validation(e.to_string()),
        other => {
            warn!(error = %other, "dataset store read failed");
            ApiError::StorageUnavailable(other.to_string())
        }
    }
}

pub async fn export_dataset(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiErr> {
    let Query(query) = query.map_err(ApiError::from)?;
    let format = ExportFormat::parse(query.format.as_deref().unwrap_or("json"))?;
    if format == ExportFormat::Csv {
        return Err(ApiError::NotImplemented("CSV".to_string()).into());
    }

    let lookup = session_id.clone();
    let dataset = with_store_blocking(state.store.clone(), move |store| store.find(&lookup))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(store_error)?
        .ok_or_else(|| ApiError::NotFound(session_id))?;

    match format {
        ExportFormat::Jsonl => {
            let line = serde_json::to_string(&dataset).map_err(|e| ApiError::Internal(e.to_string()))?;
            Ok(Json(json!({ "data": line })))
        }
        _ => {
            let value = serde_json::to_value(&dataset).map_err(|e| ApiError::Internal(e.to_string()))?;
            Ok(Json(value))
        }
    }
}

pub async fn list_datasets(State(state): State<SharedState>) -> Result<Json<Value>, ApiErr> {
    let names = with_store_blocking(state.store.clone(), |store| store.list())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(store_error)?;

    Ok(Json(json!({ "datasets": names })))
}
