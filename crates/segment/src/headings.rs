use crate::patterns::NUMBERED_HEADING_RE;
use crate::{Segmenter, Step};

/// `## <n>. Title` sections; each heading owns the lines up to the next one.
pub struct NumberedHeadings;

struct Section {
    number: u64,
    title: String,
    body: Vec<String>,
}

impl Section {
    fn into_step(self) -> Step {
        let body = self.body.join("\n");
        let body = body.trim_matches('\n');
        let content = if body.is_empty() {
            format!("## {}. {}", self.number, self.title)
        } else {
            format!("## {}. {}\n\n{}", self.number, self.title, body)
        };
        Step::new(self.number, content, Some(self.title))
    }
}

impl Segmenter for NumberedHeadings {
    fn name(&self) -> &'static str {
        "numbered_headings"
    }

    fn segment(&self, text: &str) -> Vec<Step> {
        let mut steps = Vec::new();
        let mut current: Option<Section> = None;

        for line in text.lines() {
            let heading = NUMBERED_HEADING_RE
                .captures(line)
                .and_then(|c| Some((c[1].parse::<u64>().ok()?, c[2].to_string())));

            match heading {
                Some((number, title)) => {
                    if let Some(done) = current.take() {
                        steps.push(done.into_step());
                    }
                    current = Some(Section { number, title, body: Vec::new() });
                }
                None => {
                    if let Some(section) = current.as_mut() {
                        section.body.push(line.trim_end().to_string());
                    }
                }
            }
        }
        if let Some(done) = current {
            steps.push(done.into_step());
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_collect_following_lines() {
        let text = "Preamble ignored\n## 1. Goals   \n\n  - win   \n1. nested item\n\n## 2\u{FE0F}\u{20E3} Risks\nnone";
        let steps = NumberedHeadings.segment(text);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].content, "## 1. Goals\n\n  - win\n1. nested item");
        assert_eq!(steps[0].section.as_deref(), Some("Goals"));
        assert_eq!(steps[1].content, "## 2. Risks\n\nnone");
        assert_eq!(steps[1].number, 2);
    }

    #[test]
    fn heading_without_body() {
        let steps = NumberedHeadings.segment("## 5 - Wrap up");
        assert_eq!(steps[0].content, "## 5. Wrap up");
        assert_eq!(steps[0].id, "step-5");
    }

    #[test]
    fn unnumbered_headings_are_body_text() {
        let steps = NumberedHeadings.segment("## 1. A\n## Notes\ntext");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].content, "## 1. A\n\n## Notes\ntext");
    }

    #[test]
    fn no_headings_yields_nothing() {
        assert!(NumberedHeadings.segment("# 1. Top level\n1. item").is_empty());
    }
}
