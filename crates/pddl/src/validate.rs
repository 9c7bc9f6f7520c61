use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static DOMAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\(define\s+\(domain").unwrap());

static PROBLEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\(define\s+\(problem").unwrap());

static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i):action\s+\w+").unwrap());

/// Any of the action-body keywords counts as predicate evidence.
static PREDICATES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i):predicates|:precondition|:effect").unwrap());

/// Result of scanning a text for PDDL grammar markers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub is_valid_structure: bool,
    pub has_domain: bool,
    pub has_problem: bool,
    pub has_actions: bool,
    pub has_predicates: bool,
    pub errors: Vec<String>,
}

impl ValidationRecord {
    /// Number of the four marker flags that are set (0..=4).
    pub fn flag_count(&self) -> u8 {
        [self.has_domain, self.has_problem, self.has_actions, self.has_predicates]
            .iter()
            .filter(|f| **f)
            .count() as u8
    }
}

/// Scan `text` for domain/problem/action/predicate markers and count parens.
///
/// Paren balance is a plain character count over the whole text, so
/// parens inside comments or prose are counted too.
pub fn validate(text: &str) -> ValidationRecord {
    let has_domain = DOMAIN_RE.is_match(text);
    let has_problem = PROBLEM_RE.is_match(text);
    let has_actions = ACTION_RE.is_match(text);
    let has_predicates = PREDICATES_RE.is_match(text);

    let mut errors = Vec::new();
    let open = text.chars().filter(|c| *c == '(').count();
    let close = text.chars().filter(|c| *c == ')').count();
    if open != close {
        errors.push(format!("Unbalanced parentheses: {open} open, {close} close"));
    }

    ValidationRecord {
        is_valid_structure: has_domain || has_problem || (has_actions && has_predicates),
        has_domain,
        has_problem,
        has_actions,
        has_predicates,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_marker_is_case_insensitive() {
        assert!(DOMAIN_RE.is_match("(DEFINE  (Domain blocks)"));
        assert!(!DOMAIN_RE.is_match("define domain blocks"));
    }

    #[test]
    fn problem_marker_allows_newline_between_tokens() {
        assert!(PROBLEM_RE.is_match("(define\n(problem p1)"));
    }

    #[test]
    fn action_marker_needs_a_name() {
        assert!(ACTION_RE.is_match("(:action pick-up"));
        assert!(!ACTION_RE.is_match("(:action )"));
    }

    #[test]
    fn predicate_marker_accepts_any_body_keyword() {
        assert!(PREDICATES_RE.is_match(":precondition (and)"));
        assert!(PREDICATES_RE.is_match(":EFFECT (x)"));
        assert!(PREDICATES_RE.is_match("(:predicates (on ?x ?y))"));
        assert!(!PREDICATES_RE.is_match(":parameters (?x)"));
    }

    #[test]
    fn actions_without_predicates_are_not_valid_structure() {
        let rec = validate("(:action move :parameters (?a))");
        assert!(rec.has_actions);
        assert!(!rec.has_predicates);
        assert!(!rec.is_valid_structure);
    }

    #[test]
    fn actions_with_effects_are_valid_structure() {
        let rec = validate("(:action move :effect (at ?a))");
        assert!(rec.is_valid_structure);
        assert_eq!(rec.flag_count(), 2);
    }

    #[test]
    fn problem_alone_is_valid_structure() {
        let rec = validate("(define (problem p))");
        assert!(rec.has_problem);
        assert!(rec.is_valid_structure);
        assert!(rec.errors.is_empty());
    }

    #[test]
    fn unbalanced_parens_are_reported_with_counts() {
        let rec = validate("(define (domain d)");
        assert_eq!(rec.errors, vec!["Unbalanced parentheses: 2 open, 1 close".to_string()]);
    }

    #[test]
    fn balanced_but_misordered_parens_are_not_reported() {
        let rec = validate(")(");
        assert!(rec.errors.is_empty());
    }

    #[test]
    fn record_serializes_with_flag_and_error_keys() {
        let v = serde_json::to_value(validate("(define (domain d)")).unwrap();
        assert_eq!(v["is_valid_structure"], true);
        assert_eq!(v["has_domain"], true);
        assert_eq!(v["has_problem"], false);
        assert_eq!(v["has_actions"], false);
        assert_eq!(v["has_predicates"], false);
        assert_eq!(v["errors"][0], "Unbalanced parentheses: 2 open, 1 close");
        assert_eq!(v.as_object().unwrap().len(), 6);
    }

    #[test]
    fn plain_prose_has_no_flags() {
        let rec = validate("hello world");
        assert_eq!(rec, ValidationRecord::default());
    }
}
