use std::collections::HashSet;

use regex::Regex;

use crate::patterns::{fence_tag, is_bullet, is_comment, ACTION_HEADER_RE, NUMBERED_ITEM_RE};
use crate::{Segmenter, Step};

/// Comment lines above an action that are carried along with it.
const MAX_PREFACE_COMMENTS: usize = 3;

/// `(:action ...)` definitions inside `pddl`/`lisp` fenced blocks.
///
/// Each action becomes one step holding its leading comments, the
/// definition itself (until paren depth returns to zero) and any trailing
/// comments. A numbered list entry naming the action later in the text is
/// appended as an explanation.
pub struct ActionBlocks;

impl Segmenter for ActionBlocks {
    fn name(&self) -> &'static str {
        "action_blocks"
    }

    fn segment(&self, text: &str) -> Vec<Step> {
        let lines: Vec<&str> = text.lines().collect();
        let mut seen = HashSet::new();
        let mut steps = Vec::new();

        for (start, end) in pddl_fences(&lines) {
            let mut i = start;
            // lines before this belong to an earlier action
            let mut floor = start;
            while i < end {
                let Some(name) = ACTION_HEADER_RE.captures(lines[i]).map(|c| c[1].to_string()) else {
                    i += 1;
                    continue;
                };

                let preface = preface_start(&lines, floor, i);
                let body_end = close_paren_line(&lines, i, end);
                let mut block_end = body_end;
                while block_end < end && is_comment(lines[block_end]) {
                    block_end += 1;
                }
                // comments directly above the next header are its preface
                if block_end < end && ACTION_HEADER_RE.is_match(lines[block_end]) {
                    block_end = preface_start(&lines, body_end, block_end);
                }
                floor = block_end;

                if seen.insert(name.to_lowercase()) {
                    let mut content = lines[preface..block_end].join("\n");
                    if let Some(explanation) = find_explanation(&name, &lines[block_end..]) {
                        content.push_str("\n\n**Explanation:**\n");
                        content.push_str(&explanation);
                    }
                    let number = steps.len() as u64 + 1;
                    steps.push(Step::new(number, content, Some(format!("PDDL Action: {name}"))));
                }
                i = block_end.max(i + 1);
            }
        }
        steps
    }
}

/// Line ranges (exclusive of the fence lines) of fences tagged pddl or lisp.
/// An unterminated fence runs to the end of the text.
fn pddl_fences(lines: &[&str]) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut open: Option<(usize, bool)> = None;

    for (i, line) in lines.iter().enumerate() {
        let Some(tag) = fence_tag(line) else {
            continue;
        };
        match open.take() {
            None => {
                let tag = tag.to_ascii_lowercase();
                open = Some((i + 1, tag == "pddl" || tag == "lisp"));
            }
            Some((start, qualifies)) => {
                if qualifies {
                    out.push((start, i));
                }
            }
        }
    }
    if let Some((start, true)) = open {
        out.push((start, lines.len()));
    }
    out
}

/// First line of the run of comment lines directly above `header`.
fn preface_start(lines: &[&str], fence_start: usize, header: usize) -> usize {
    let mut first = header;
    while first > fence_start && header - first < MAX_PREFACE_COMMENTS && is_comment(lines[first - 1]) {
        first -= 1;
    }
    first
}

/// Index one past the line where paren depth, counted from `header`,
/// returns to zero. Stops at `end` if the block never closes.
fn close_paren_line(lines: &[&str], header: usize, end: usize) -> usize {
    let mut depth: i64 = 0;
    for (k, line) in lines.iter().enumerate().take(end).skip(header) {
        depth += line.matches('(').count() as i64;
        depth -= line.matches(')').count() as i64;
        if depth <= 0 {
            return k + 1;
        }
    }
    end
}

/// `pick-up` reads as `Pick Up`.
fn readable_name(name: &str) -> String {
    name.split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Bold and plain shapes for both the readable and the raw action name.
fn explanation_patterns(name: &str) -> Vec<Regex> {
    let readable = regex::escape(&readable_name(name));
    let raw = regex::escape(name);
    [
        format!(r"(?i)^\s*\d+[.:)]\s*\*\*{readable}\*\*"),
        format!(r"(?i)^\s*\d+[.:)]\s*\*\*{raw}\*\*"),
        format!(r"(?i)^\s*\d+[.:)]\s*{readable}\b"),
        format!(r"(?i)^\s*\d+[.:)]\s*{raw}\b"),
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
}

/// The numbered entry for `name` plus its continuation lines.
fn find_explanation(name: &str, rest: &[&str]) -> Option<String> {
    let patterns = explanation_patterns(name);
    let at = rest
        .iter()
        .position(|line| patterns.iter().any(|re| re.is_match(line)))?;

    let mut taken = vec![rest[at].trim()];
    let mut k = at + 1;
    if let Some(next) = rest.get(k) {
        if !next.trim().is_empty() && !NUMBERED_ITEM_RE.is_match(next) {
            taken.push(next.trim());
            k += 1;
        }
    }
    while let Some(line) = rest.get(k) {
        if !is_bullet(line) {
            break;
        }
        taken.push(line.trim());
        k += 1;
    }
    Some(taken.join("\n"))
}
