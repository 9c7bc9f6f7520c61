use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use rlhf::{assemble, check_session_id, validate_feedback};
use tracing::{error, info};

use crate::error::{ApiErr, ApiError};
use crate::state::SharedState;
use crate::store_exec::with_store_blocking;
use crate::types::{SubmitFeedbackRequest, SubmitFeedbackResponse};

/// Validate ratings, build the training record and persist it exactly once.
pub async fn submit_feedback(
    State(state): State<SharedState>,
    payload: Result<Json<SubmitFeedbackRequest>, JsonRejection>,
) -> Result<Json<SubmitFeedbackResponse>, ApiErr> {
    let Json(req) = payload.map_err(ApiError::from)?;

    check_session_id(&req.session_id).map_err(|e| ApiError::Validation(e.to_string()))?;
    validate_feedback(&req.feedback).map_err(|e| ApiError::Validation(e.to_string()))?;

    let mut metadata = req.metadata;
    if metadata.model.is_none() {
        metadata.model = Some(state.model.clone());
    }

    let dataset = assemble(&req.session_id, &req.prompt, &req.plan_text, req.feedback, metadata);

    let to_store = dataset.clone();
    let receipt = with_store_blocking(state.store.clone(), move |store| store.put(&to_store))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(|e| {
            error!(session_id = %dataset.session_id, error = %e, "dataset write failed");
            ApiError::Persistence(e.to_string())
        })?;

    info!(
        session_id = %dataset.session_id,
        file_path = %receipt.file_path,
        score = dataset.aggregated_metrics.overall_score,
        trainable = dataset.training_metadata.can_use_for_training,
        "dataset saved"
    );

    Ok(Json(SubmitFeedbackResponse {
        success: true,
        dataset,
        file_path: receipt.file_path,
        content_hash: hex::encode(receipt.content_hash),
    }))
}
