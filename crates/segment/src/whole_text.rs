use crate::{Segmenter, Step};

pub const SECTION: &str = "Complete Plan";

/// Last resort: the entire input, unmodified, as step 1.
pub struct WholeText;

impl Segmenter for WholeText {
    fn name(&self) -> &'static str {
        "whole_text"
    }

    fn segment(&self, text: &str) -> Vec<Step> {
        vec![Step::new(1, text, Some(SECTION.to_string()))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_input_verbatim_including_empty() {
        let steps = WholeText.segment("");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].content, "");

        let steps = WholeText.segment("  padded\n\n");
        assert_eq!(steps[0].content, "  padded\n\n");
        assert_eq!(steps[0].section.as_deref(), Some(SECTION));
    }
}
