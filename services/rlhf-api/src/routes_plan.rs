use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use invoker::CompletionRequest;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ApiErr, ApiError};
use crate::state::SharedState;
use crate::types::{GeneratePlanRequest, GeneratePlanResponse, PlanMetadata};

pub async fn generate_plan(
    State(state): State<SharedState>,
    payload: Result<Json<GeneratePlanRequest>, JsonRejection>,
) -> Result<Json<GeneratePlanResponse>, ApiErr> {
    let Json(req) = payload.map_err(ApiError::from)?;
    req.validate()?;

    let session_id = Uuid::new_v4().to_string();

    let completion = state
        .provider
        .complete(&CompletionRequest {
            system_prompt: state.system_prompt.clone(),
            user_prompt: req.prompt.clone(),
            max_tokens: req.max_tokens,
            temperature: req.temperature,
        })
        .await
        .map_err(|e| {
            warn!(session_id = %session_id, error = %e, "model call failed");
            ApiError::Model(e)
        })?;

    let steps = segment::segment(&completion.content);
    info!(session_id = %session_id, steps = steps.len(), "plan generated");

    Ok(Json(GeneratePlanResponse {
        session_id,
        prompt: req.prompt,
        plan_text: completion.content,
        steps,
        metadata: PlanMetadata {
            model: state.model.clone(),
            temperature: req.temperature,
            max_tokens: req.max_tokens,
            prompt_tokens: completion.usage.prompt_tokens,
            completion_tokens: completion.usage.completion_tokens,
            total_tokens: completion.usage.total_tokens,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        },
    }))
}
