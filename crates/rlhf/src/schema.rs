use chrono::{DateTime, Utc};
use pddl::ValidationRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Negative ratings must explain themselves in at least this many characters.
pub const MIN_NEGATIVE_REASON_CHARS: usize = 10;

/// Reasons longer than this are labelled `detailed`.
pub const DETAILED_REASON_CHARS: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Positive,
    Negative,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackQuality {
    Detailed,
    Basic,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeedbackError {
    #[error("step {step_id}: reason is required and must be at least 10 characters for negative ratings")]
    ReasonRequired { step_id: String },
}

/// One human judgment on one step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub step_id: String,
    pub step_number: u64,
    pub step_content: String,
    pub rating: Rating,
    #[serde(default)]
    pub reason: Option<String>,
}

impl FeedbackItem {
    pub fn validate(&self) -> Result<(), FeedbackError> {
        if self.rating == Rating::Negative {
            let len = self.reason.as_deref().map_or(0, |r| r.chars().count());
            if len < MIN_NEGATIVE_REASON_CHARS {
                return Err(FeedbackError::ReasonRequired { step_id: self.step_id.clone() });
            }
        }
        Ok(())
    }

    pub fn quality(&self) -> FeedbackQuality {
        match &self.reason {
            Some(r) if r.chars().count() > DETAILED_REASON_CHARS => FeedbackQuality::Detailed,
            _ => FeedbackQuality::Basic,
        }
    }
}

/// Reject the whole submission on the first invalid item.
pub fn validate_feedback(items: &[FeedbackItem]) -> Result<(), FeedbackError> {
    items.iter().try_for_each(FeedbackItem::validate)
}

/// Generation settings and token usage reported alongside a plan.
/// Every field is optional on input; unknown fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelMetadata {
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u64>,
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    #[serde(flatten)]
    pub item: FeedbackItem,
    pub feedback_quality: FeedbackQuality,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PddlStructure {
    pub domain_definition: Option<String>,
    pub problem_definition: Option<String>,
    pub plan_sequence: Option<String>,
    pub validation: ValidationRecord,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AggregatedMetrics {
    pub total_steps: usize,
    pub positive_ratings: usize,
    pub negative_ratings: usize,
    pub overall_score: f64,        // 0.0..=1.0, 3 decimals
    pub pddl_validity_score: f64,  // quarters
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub pipeline_type: String,
    pub evaluation_method: String,
    pub domain_type: String,
    pub can_use_for_training: bool,
}

/// Write-once training record for one feedback submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub dataset_format: String,
    pub reference: String,
    pub original_prompt: String,
    pub model_output: String,
    pub pddl_structure: PddlStructure,
    pub model_metadata: ModelMetadata,
    pub human_feedback: Vec<FeedbackRecord>,
    pub aggregated_metrics: AggregatedMetrics,
    pub training_metadata: TrainingMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(rating: Rating, reason: Option<&str>) -> FeedbackItem {
        FeedbackItem {
            step_id: "step-1".into(),
            step_number: 1,
            step_content: "(pick-up a)".into(),
            rating,
            reason: reason.map(str::to_string),
        }
    }

    #[test]
    fn negative_needs_ten_character_reason() {
        assert!(item(Rating::Negative, None).validate().is_err());
        assert!(item(Rating::Negative, Some("too short")).validate().is_err());
        assert!(item(Rating::Negative, Some("ten chars!")).validate().is_ok());
    }

    #[test]
    fn reason_length_counts_characters_not_bytes() {
        assert!(item(Rating::Negative, Some("ééééééééé")).validate().is_err());
    }

    #[test]
    fn positive_needs_no_reason() {
        assert!(item(Rating::Positive, None).validate().is_ok());
    }

    #[test]
    fn quality_is_detailed_past_fifty_characters() {
        assert_eq!(item(Rating::Positive, None).quality(), FeedbackQuality::Basic);
        assert_eq!(item(Rating::Positive, Some(&"x".repeat(50))).quality(), FeedbackQuality::Basic);
        assert_eq!(item(Rating::Positive, Some(&"x".repeat(51))).quality(), FeedbackQuality::Detailed);
    }

    #[test]
    fn batch_validation_names_the_failing_step() {
        let mut bad = item(Rating::Negative, Some("nope"));
        bad.step_id = "step-9".into();
        let err = validate_feedback(&[item(Rating::Positive, None), bad]).unwrap_err();
        assert_eq!(err, FeedbackError::ReasonRequired { step_id: "step-9".into() });
    }

    #[test]
    fn rating_uses_lowercase_wire_names() {
        let parsed: FeedbackItem = serde_json::from_str(
            r#"{"step_id":"step-2","step_number":2,"step_content":"x","rating":"negative","reason":"wrong block order"}"#,
        )
        .unwrap();
        assert_eq!(parsed.rating, Rating::Negative);
        assert!(serde_json::from_str::<Rating>(r#""meh""#).is_err());
    }

    #[test]
    fn metadata_tolerates_missing_and_unknown_fields() {
        let m: ModelMetadata = serde_json::from_str(r#"{"temperature":0.3,"timestamp":"x"}"#).unwrap();
        assert_eq!(m.temperature, Some(0.3));
        assert_eq!(m.max_tokens, None);
    }
}
