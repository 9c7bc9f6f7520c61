use serde_json::Value;

use crate::{Segmenter, Step};

pub const SECTION: &str = "PDDL Plan";

/// Output that is itself a JSON document with a `pddl.plan` field.
///
/// `plan` may be a text blob (one step per non-blank line) or an array
/// (one step per element). `pddl.plan_steps` adds per-step details keyed by
/// the 1-based step number, and a `natural_language_explanation` (top level
/// or under `pddl`) is prepended to the first step.
///
/// Parse failures and unexpected shapes yield no steps so the cascade moves
/// on; they are never reported.
pub struct JsonPlan;

impl Segmenter for JsonPlan {
    fn name(&self) -> &'static str {
        "json_plan"
    }

    fn segment(&self, text: &str) -> Vec<Step> {
        parse(text).unwrap_or_default()
    }
}

fn parse(text: &str) -> Option<Vec<Step>> {
    let doc: Value = serde_json::from_str(text.trim()).ok()?;
    let pddl = doc.get("pddl")?;

    let items: Vec<String> = match pddl.get("plan")? {
        Value::String(blob) => blob
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Array(entries) => entries.iter().map(stringify).collect(),
        _ => return None,
    };

    let details = pddl.get("plan_steps").and_then(Value::as_object);
    let overview = doc
        .get("natural_language_explanation")
        .or_else(|| pddl.get("natural_language_explanation"))
        .map(stringify)
        .filter(|s| !s.trim().is_empty());

    let steps = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let number = i as u64 + 1;
            let mut content = item;
            if let Some(detail) = details.and_then(|d| d.get(&number.to_string())) {
                content = format!("{content}\n\n**Details:**\n{}", stringify(detail));
            }
            if number == 1 {
                if let Some(overview) = &overview {
                    content = format!("**Plan Overview:**\n{overview}\n\n{content}");
                }
            }
            Step::new(number, content, Some(SECTION.to_string()))
        })
        .collect();
    Some(steps)
}

fn stringify(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
