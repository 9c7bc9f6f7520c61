use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// `(define (domain ...)` through the first line that is only `)`.
static DOMAIN_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ims)\(define\s+\(domain[^)]*\).*?\n\)[ \t\r]*$").unwrap()
});

static PROBLEM_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ims)\(define\s+\(problem[^)]*\).*?\n\)[ \t\r]*$").unwrap()
});

/// Text after a plan marker up to the next horizontal rule or end of text.
/// The third marker is the keycap-three emoji, with or without its variation selector.
static PLAN_SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ims)(?:PLAN:|Executable Plan|3\x{FE0F}?\x{20E3})(.*?)(?:^[ \t]*-{3,}[ \t\r]*$|\z)")
        .unwrap()
});

/// Domain, problem and plan sections found in a model output.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PddlComponents {
    pub domain: Option<String>,
    pub problem: Option<String>,
    pub plan: Option<String>,
}

pub fn extract_components(text: &str) -> PddlComponents {
    PddlComponents {
        domain: block(&DOMAIN_BLOCK_RE, text),
        problem: block(&PROBLEM_BLOCK_RE, text),
        plan: PLAN_SECTION_RE
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|p| !p.is_empty()),
    }
}

fn block(re: &Regex, text: &str) -> Option<String> {
    re.find(text).map(|m| m.as_str().trim_end().to_string())
}
