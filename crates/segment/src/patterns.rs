//! Line-level recognisers shared by the strategies.

use std::sync::LazyLock;

use regex::Regex;

// ============================================================================
// Fences and PDDL
// ============================================================================

/// Opening or closing code fence; group 1 is the info string (may be empty).
pub static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*```\s*([A-Za-z0-9_+\-]*)").unwrap());

/// `(:action <name>` at the start of a line; group 1 is the action name.
pub static ACTION_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*\(:(?:durative-)?action\s+([A-Za-z0-9_\-]+)").unwrap()
});

// ============================================================================
// Markdown structure
// ============================================================================

/// `## 2. Title`, `## 2️⃣ Title`, `## 2 - Title`. Exactly two hashes.
pub static NUMBERED_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^##[ \t]*(\d+)[ \t.:)\-\x{2013}\x{2014}\x{FE0F}\x{20E3}]+(\S.*?)\s*$").unwrap()
});

/// Table separator row: every cell holds only dashes, colons and blanks.
pub static TABLE_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\|(?:[ \t:\-]*\|)+\s*$").unwrap());

/// `| 1. Title | col2 | col3 |`, optionally with the first cell in bold.
pub static TABLE_ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\|\s*(?:\*\*)?\s*(\d+)\s*[.)]?\s*([^|]*?)\s*\|([^|]*)\|([^|]*)\|\s*$").unwrap()
});

/// `3. text`, `3: text`, `3) text`.
pub static NUMBERED_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)[.:)]\s+(\S.*?)\s*$").unwrap());

pub fn is_table_separator(line: &str) -> bool {
    TABLE_SEPARATOR_RE.is_match(line) && line.contains('-')
}

pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with(';')
}

pub fn is_bullet(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with('-') || t.starts_with('*') || t.starts_with('\u{2022}')
}

/// Fence info string when `line` opens or closes a fence.
pub fn fence_tag(line: &str) -> Option<&str> {
    FENCE_RE
        .captures(line)
        .map(|c| c.get(1).map_or("", |m| m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fence_reports_tag() {
        assert_eq!(fence_tag("```pddl"), Some("pddl"));
        assert_eq!(fence_tag("  ``` LISP"), Some("LISP"));
        assert_eq!(fence_tag("```"), Some(""));
        assert_eq!(fence_tag("code ```"), None);
    }

    #[test]
    fn action_header_captures_hyphenated_name() {
        let c = ACTION_HEADER_RE.captures("  (:action pick-up").unwrap();
        assert_eq!(&c[1], "pick-up");
        let c = ACTION_HEADER_RE.captures("(:durative-action fly_plane").unwrap();
        assert_eq!(&c[1], "fly_plane");
        assert!(!ACTION_HEADER_RE.is_match("; (:action in comment"));
    }

    #[test]
    fn numbered_heading_accepts_separators() {
        let c = NUMBERED_HEADING_RE.captures("## 2. Define the domain").unwrap();
        assert_eq!((&c[1], &c[2]), ("2", "Define the domain"));
        let c = NUMBERED_HEADING_RE.captures("## 1\u{FE0F}\u{20E3} Goals  ").unwrap();
        assert_eq!((&c[1], &c[2]), ("1", "Goals"));
        let c = NUMBERED_HEADING_RE.captures("##3 - Risks").unwrap();
        assert_eq!((&c[1], &c[2]), ("3", "Risks"));
    }

    #[test]
    fn numbered_heading_rejects_other_levels() {
        assert!(!NUMBERED_HEADING_RE.is_match("### 2. Sub"));
        assert!(!NUMBERED_HEADING_RE.is_match("# 2. Top"));
        assert!(!NUMBERED_HEADING_RE.is_match("## Overview"));
        assert!(!NUMBERED_HEADING_RE.is_match("## 2."));
    }

    #[test]
    fn table_separator_needs_dashes() {
        assert!(is_table_separator("|---|:---:|---|"));
        assert!(is_table_separator("| --- | --- |"));
        assert!(!is_table_separator("| a | b |"));
        assert!(!is_table_separator("| | |"));
    }

    #[test]
    fn table_row_splits_three_cells() {
        let c = TABLE_ROW_RE
            .captures("| **1. Identify companies** | list them | focus |")
            .unwrap();
        assert_eq!(&c[1], "1");
        assert_eq!(&c[2], "Identify companies**");
        assert_eq!(c[3].trim(), "list them");
        assert_eq!(c[4].trim(), "focus");
        assert!(!TABLE_ROW_RE.is_match("| Step | What | Why |"));
        assert!(!TABLE_ROW_RE.is_match("| 1. a | b | c | d |"));
    }

    #[test]
    fn numbered_item_accepts_three_delimiters() {
        for line in ["1. Pack bags", "1: Pack bags", "  1) Pack bags"] {
            let c = NUMBERED_ITEM_RE.captures(line).unwrap();
            assert_eq!((&c[1], &c[2]), ("1", "Pack bags"));
        }
        assert!(!NUMBERED_ITEM_RE.is_match("1.5 kg"));
        assert!(!NUMBERED_ITEM_RE.is_match("1.Pack"));
    }

    #[test]
    fn line_classifiers() {
        assert!(is_comment("  ; picks a block"));
        assert!(!is_comment("(:action a ; x"));
        assert!(is_bullet("   - detail"));
        assert!(is_bullet("* detail"));
        assert!(!is_bullet("detail"));
    }
}
