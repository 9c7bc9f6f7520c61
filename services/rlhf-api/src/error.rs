use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::Json;
use invoker::InvokeError;
use serde_json::{json, Value};
use thiserror::Error;

/// What handlers return on failure.
pub type ApiErr = (StatusCode, Json<Value>);

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed client input; nothing was processed.
    #[error("{0}")]
    Validation(String),

    #[error("Invalid format {0:?}. Use json, jsonl, or csv")]
    InvalidFormat(String),

    #[error("Error calling PDDL model: {0}")]
    Model(#[from] InvokeError),

    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("{0} format not yet implemented")]
    NotImplemented(String),

    /// The request was fine but the record could not be saved.
    #[error("Failed to save dataset: {0}")]
    Persistence(String),

    #[error("Dataset storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
            ApiError::Model(InvokeError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Model(_) => StatusCode::BAD_GATEWAY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            ApiError::Persistence(_) | ApiError::StorageUnavailable(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::InvalidFormat(_) => "invalid_format",
            ApiError::Model(InvokeError::Timeout(_)) => "model_timeout",
            ApiError::Model(_) => "model_error",
            ApiError::NotFound(_) => "not_found",
            ApiError::NotImplemented(_) => "not_implemented",
            ApiError::Persistence(_) => "persistence_failed",
            ApiError::StorageUnavailable(_) => "storage_unavailable",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            ApiError::Model(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl From<ApiError> for ApiErr {
    fn from(e: ApiError) -> Self {
        let mut body = json!({
            "error": e.kind(),
            "detail": e.to_string(),
        });
        if e.retryable() {
            body["retryable"] = Value::Bool(true);
        }
        (e.status(), Json(body))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::Validation(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError::Validation(e.body_text())
    }
}
