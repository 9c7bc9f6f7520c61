//! Plan segmentation
//!
//! Carves freeform model output into ordered, independently ratable steps.
//! A fixed cascade of strategies is probed in priority order and the first
//! one that yields anything wins:
//!
//! 1. embedded JSON plan (`pddl.plan`)
//! 2. `(:action ...)` blocks inside `pddl`/`lisp` fences
//! 3. `## <n>. Title` section headings
//! 4. Markdown table rows after a separator row
//! 5. plain numbered list lines
//! 6. the whole text as a single step
//!
//! Segmentation never fails: unrecognised text degrades to one opaque step.

mod action_blocks;
mod headings;
mod json_plan;
mod numbered;
pub mod patterns;
mod table;
mod whole_text;

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use action_blocks::ActionBlocks;
pub use headings::NumberedHeadings;
pub use json_plan::JsonPlan;
pub use numbered::NumberedList;
pub use table::TableRows;
pub use whole_text::WholeText;

/// One human-ratable unit of a plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(rename = "step_id")]
    pub id: String,
    #[serde(rename = "step_number")]
    pub number: u64,
    #[serde(rename = "step_content")]
    pub content: String,
    pub section: Option<String>,
}

impl Step {
    pub fn new(number: u64, content: impl Into<String>, section: Option<String>) -> Self {
        Self {
            id: format!("step-{number}"),
            number,
            content: content.into(),
            section,
        }
    }
}

/// One recogniser in the cascade. An empty result means "not mine".
pub trait Segmenter: Send + Sync {
    /// Name of this strategy for logging
    fn name(&self) -> &'static str;

    fn segment(&self, text: &str) -> Vec<Step>;
}

/// Ordered list of strategies; the first non-empty result is returned as is.
pub struct Pipeline {
    strategies: Vec<Box<dyn Segmenter>>,
}

impl Pipeline {
    pub fn new(strategies: Vec<Box<dyn Segmenter>>) -> Self {
        Self { strategies }
    }

    /// The standard six-strategy cascade.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(JsonPlan),
            Box::new(ActionBlocks),
            Box::new(NumberedHeadings),
            Box::new(TableRows),
            Box::new(NumberedList),
            Box::new(WholeText),
        ])
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run the cascade. Falls back to [`WholeText`] if every strategy
    /// (including any custom ones) comes back empty.
    pub fn run(&self, text: &str) -> Vec<Step> {
        for strategy in &self.strategies {
            let steps = strategy.segment(text);
            if !steps.is_empty() {
                debug!(strategy = strategy.name(), steps = steps.len(), "segmented plan");
                return steps;
            }
        }
        debug!(strategy = WholeText.name(), "no strategy matched");
        WholeText.segment(text)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

static STANDARD: LazyLock<Pipeline> = LazyLock::new(Pipeline::standard);

/// Segment `text` with the standard cascade. Always returns at least one step.
pub fn segment(text: &str) -> Vec<Step> {
    STANDARD.run(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str, Vec<Step>);

    impl Segmenter for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn segment(&self, _text: &str) -> Vec<Step> {
            self.1.clone()
        }
    }

    #[test]
    fn step_id_derives_from_number() {
        let s = Step::new(7, "x", None);
        assert_eq!(s.id, "step-7");
    }

    #[test]
    fn step_serializes_with_wire_names() {
        let v = serde_json::to_value(Step::new(2, "Buy tickets", Some("Steps".into()))).unwrap();
        assert_eq!(v["step_id"], "step-2");
        assert_eq!(v["step_number"], 2);
        assert_eq!(v["step_content"], "Buy tickets");
        assert_eq!(v["section"], "Steps");
    }

    #[test]
    fn first_non_empty_strategy_wins() {
        let p = Pipeline::new(vec![
            Box::new(Fixed("empty", vec![])),
            Box::new(Fixed("a", vec![Step::new(1, "from a", None)])),
            Box::new(Fixed("b", vec![Step::new(1, "from b", None)])),
        ]);
        let steps = p.run("anything");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].content, "from a");
    }

    #[test]
    fn empty_pipeline_still_returns_whole_text() {
        let p = Pipeline::new(vec![]);
        let steps = p.run("raw");
        assert_eq!(steps, vec![Step::new(1, "raw", Some("Complete Plan".into()))]);
    }

    #[test]
    fn standard_order_is_fixed() {
        assert_eq!(
            Pipeline::standard().strategy_names(),
            vec!["json_plan", "action_blocks", "numbered_headings", "table_rows", "numbered_list", "whole_text"]
        );
    }
}
