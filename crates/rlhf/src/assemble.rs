use chrono::{DateTime, Utc};
use pddl::{extract_components, validate, ValidationRecord};

use crate::schema::{
    AggregatedMetrics, Dataset, FeedbackItem, FeedbackRecord, ModelMetadata, PddlStructure, Rating,
    TrainingMetadata,
};

pub const DATASET_FORMAT: &str = "MIT_PDDL_BlocksWorld_RLHF";
pub const REFERENCE: &str = "https://github.com/CassieHuang22/llm-as-pddl-formalizer";
pub const PIPELINE_TYPE: &str = "llm-as-formalizer";
pub const EVALUATION_METHOD: &str = "human_feedback";
pub const DOMAIN_TYPE: &str = "general_planning";

pub const DEFAULT_TEMPERATURE: f64 = 0.5;
pub const DEFAULT_MAX_TOKENS: u64 = 10_000;

/// Minimum share of positive ratings for a record to be trainable.
pub const TRAINING_SCORE_THRESHOLD: f64 = 0.70;

/// Build the training record for one feedback submission, stamped now.
pub fn assemble(
    session_id: &str,
    prompt: &str,
    plan_text: &str,
    feedback: Vec<FeedbackItem>,
    metadata: ModelMetadata,
) -> Dataset {
    assemble_at(session_id, prompt, plan_text, feedback, metadata, Utc::now())
}

pub fn assemble_at(
    session_id: &str,
    prompt: &str,
    plan_text: &str,
    feedback: Vec<FeedbackItem>,
    metadata: ModelMetadata,
    at: DateTime<Utc>,
) -> Dataset {
    let validation = validate(plan_text);
    let components = extract_components(plan_text);
    let raw_score = positive_share(&feedback);
    let aggregated_metrics = aggregate(&feedback, &validation);
    let can_use_for_training =
        raw_score >= TRAINING_SCORE_THRESHOLD && validation.is_valid_structure;

    let model_metadata = ModelMetadata {
        temperature: metadata.temperature.or(Some(DEFAULT_TEMPERATURE)),
        max_tokens: metadata.max_tokens.or(Some(DEFAULT_MAX_TOKENS)),
        ..metadata
    };

    let human_feedback = feedback
        .into_iter()
        .map(|item| FeedbackRecord {
            feedback_quality: item.quality(),
            item,
        })
        .collect();

    Dataset {
        session_id: session_id.to_string(),
        timestamp: at,
        dataset_format: DATASET_FORMAT.to_string(),
        reference: REFERENCE.to_string(),
        original_prompt: prompt.to_string(),
        model_output: plan_text.to_string(),
        pddl_structure: PddlStructure {
            domain_definition: components.domain,
            problem_definition: components.problem,
            plan_sequence: components.plan,
            validation,
        },
        model_metadata,
        human_feedback,
        aggregated_metrics,
        training_metadata: TrainingMetadata {
            pipeline_type: PIPELINE_TYPE.to_string(),
            evaluation_method: EVALUATION_METHOD.to_string(),
            domain_type: DOMAIN_TYPE.to_string(),
            can_use_for_training,
        },
    }
}

pub fn aggregate(feedback: &[FeedbackItem], validation: &ValidationRecord) -> AggregatedMetrics {
    let positive = feedback.iter().filter(|f| f.rating == Rating::Positive).count();
    let negative = feedback.iter().filter(|f| f.rating == Rating::Negative).count();

    AggregatedMetrics {
        total_steps: feedback.len(),
        positive_ratings: positive,
        negative_ratings: negative,
        overall_score: round3(positive_share(feedback)),
        pddl_validity_score: f64::from(validation.flag_count()) / 4.0,
    }
}

fn positive_share(feedback: &[FeedbackItem]) -> f64 {
    if feedback.is_empty() {
        return 0.0;
    }
    let positive = feedback.iter().filter(|f| f.rating == Rating::Positive).count();
    positive as f64 / feedback.len() as f64
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
