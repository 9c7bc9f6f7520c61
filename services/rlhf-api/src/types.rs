use rlhf::{Dataset, FeedbackItem, ModelMetadata};
use segment::Step;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const PROMPT_CHARS: std::ops::RangeInclusive<usize> = 10..=5000;
pub const TEMPERATURE: std::ops::RangeInclusive<f32> = 0.0..=1.0;
pub const MAX_TOKENS: std::ops::RangeInclusive<u32> = 1000..=20000;

fn default_temperature() -> f32 {
    0.5
}

fn default_max_tokens() -> u32 {
    10_000
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratePlanRequest {
    pub prompt: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl GeneratePlanRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let len = self.prompt.chars().count();
        if !PROMPT_CHARS.contains(&len) {
            return Err(ApiError::Validation(format!(
                "prompt must be between {} and {} characters, got {len}",
                PROMPT_CHARS.start(),
                PROMPT_CHARS.end()
            )));
        }
        if !TEMPERATURE.contains(&self.temperature) {
            return Err(ApiError::Validation(format!(
                "temperature must be between 0.0 and 1.0, got {}",
                self.temperature
            )));
        }
        if !MAX_TOKENS.contains(&self.max_tokens) {
            return Err(ApiError::Validation(format!(
                "max_tokens must be between {} and {}, got {}",
                MAX_TOKENS.start(),
                MAX_TOKENS.end(),
                self.max_tokens
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanMetadata {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
    pub timestamp: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratePlanResponse {
    pub session_id: String,
    pub prompt: String,
    pub plan_text: String,
    pub steps: Vec<Step>,
    pub metadata: PlanMetadata,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitFeedbackRequest {
    pub session_id: String,
    pub prompt: String,
    pub plan_text: String,
    pub feedback: Vec<FeedbackItem>,
    #[serde(default)]
    pub metadata: ModelMetadata,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitFeedbackResponse {
    pub success: bool,
    pub dataset: Dataset,
    pub file_path: String,
    pub content_hash: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Jsonl,
    Csv,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Result<Self, ApiError> {
        match s {
            "json" => Ok(Self::Json),
            "jsonl" => Ok(Self::Jsonl),
            "csv" => Ok(Self::Csv),
            other => Err(ApiError::InvalidFormat(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}
