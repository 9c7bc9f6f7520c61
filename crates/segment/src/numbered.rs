use crate::patterns::NUMBERED_ITEM_RE;
use crate::{Segmenter, Step};

pub const SECTION: &str = "Steps";

/// Every `<n>. text` line anywhere in the text, in line order.
///
/// Numbers are taken as written; duplicated or out-of-order numbering is
/// passed through rather than re-sorted.
pub struct NumberedList;

impl Segmenter for NumberedList {
    fn name(&self) -> &'static str {
        "numbered_list"
    }

    fn segment(&self, text: &str) -> Vec<Step> {
        text.lines()
            .filter_map(|line| {
                let c = NUMBERED_ITEM_RE.captures(line)?;
                let number = c[1].parse().ok()?;
                Some(Step::new(number, c[2].to_string(), Some(SECTION.to_string())))
            })
            .collect()
    }
}
