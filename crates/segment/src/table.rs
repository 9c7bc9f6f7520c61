use crate::patterns::{is_table_separator, TABLE_ROW_RE};
use crate::{Segmenter, Step};

pub const SECTION: &str = "Workflow";

/// Rows of a three-column workflow table: `| n. title | what | why |`.
///
/// Only rows after a separator row count; any line that does not start
/// with `|` ends the table.
pub struct TableRows;

impl Segmenter for TableRows {
    fn name(&self) -> &'static str {
        "table_rows"
    }

    fn segment(&self, text: &str) -> Vec<Step> {
        let mut steps = Vec::new();
        let mut in_table = false;

        for line in text.lines() {
            let trimmed = line.trim();
            if is_table_separator(trimmed) {
                in_table = true;
                continue;
            }
            if !trimmed.starts_with('|') {
                in_table = false;
                continue;
            }
            if !in_table {
                continue;
            }
            let Some(c) = TABLE_ROW_RE.captures(trimmed) else {
                continue;
            };
            let Ok(number) = c[1].parse() else {
                continue;
            };
            let title = c[2].trim_matches('*').trim();
            steps.push(Step::new(
                number,
                row_content(title, c[3].trim(), c[4].trim()),
                Some(SECTION.to_string()),
            ));
        }
        steps
    }
}

fn row_content(title: &str, what: &str, why: &str) -> String {
    let mut parts = Vec::new();
    if !title.is_empty() {
        parts.push(format!("**{title}**"));
    }
    if !what.is_empty() && what != title {
        parts.push(format!("**What to do:** {what}"));
    }
    if !why.is_empty() {
        parts.push(format!("**Why it matters:** {why}"));
    }
    parts.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "| Step | Action | Rationale |\n|---|---|---|\n| 1. Scout | gather intel | reduces risk |\n| **2. Strike** | move in |  |";

    #[test]
    fn rows_after_separator_become_steps() {
        let steps = TableRows.segment(TABLE);
        assert_eq!(steps.len(), 2);
        assert_eq!(
            steps[0].content,
            "**Scout**\n\n**What to do:** gather intel\n\n**Why it matters:** reduces risk"
        );
        assert_eq!(steps[0].section.as_deref(), Some(SECTION));
        assert_eq!(steps[1].number, 2);
        assert_eq!(steps[1].content, "**Strike**\n\n**What to do:** move in");
    }

    #[test]
    fn rows_before_separator_are_ignored() {
        let text = "| 1. Early | a | b |\n|---|---|---|";
        assert!(TableRows.segment(text).is_empty());
    }

    #[test]
    fn prose_line_closes_the_table() {
        let text = "|---|---|---|\nsome prose\n| 1. Late | a | b |";
        assert!(TableRows.segment(text).is_empty());
    }

    #[test]
    fn separator_reopens_a_later_table() {
        let text = "|---|---|---|\n\n| h | h | h |\n|:--|:--|:--|\n| 4. Four | x | y |";
        let steps = TableRows.segment(text);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].id, "step-4");
    }
}
