use segment::{segment, JsonPlan, Segmenter, Step};

#[test]
fn test_plain_numbered_list() {
    let steps = segment("1. Pack bags\n2. Buy tickets");

    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].number, 1);
    assert_eq!(steps[1].number, 2);
    assert!(steps.iter().all(|s| s.section.as_deref() == Some("Steps")));
}

#[test]
fn test_fenced_action_without_explanation() {
    let text = "```pddl\n(:action load\n  :parameters (?t)\n)\n```";
    let steps = segment(text);

    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].section.as_deref(), Some("PDDL Action: load"));
    assert_eq!(steps[0].content, "(:action load\n  :parameters (?t)\n)");
}

#[test]
fn test_workflow_table_row() {
    let text = "| Step | What | Why |\n| --- | --- | --- |\n| 1. Scout | gather intel | reduces risk |";
    let steps = segment(text);

    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].section.as_deref(), Some("Workflow"));
    assert!(steps[0].content.contains("Scout"));
    assert!(steps[0].content.contains("**What to do:** gather intel"));
    assert!(steps[0].content.contains("**Why it matters:** reduces risk"));
}

#[test]
fn test_unstructured_text_is_one_step() {
    let steps = segment("hello world");

    assert_eq!(steps, vec![Step::new(1, "hello world", Some("Complete Plan".to_string()))]);
}

#[test]
fn test_segment_is_total() {
    let inputs = [
        "",
        "\n\n\n",
        "```pddl\n",
        "```pddl\n(:action\n```",
        "| 1. a | b | c |",
        "{\"pddl\": {}}",
        "## ",
        "((((((",
        "\u{FE0F}\u{20E3}",
    ];
    for input in inputs {
        assert!(!segment(input).is_empty(), "no steps for {input:?}");
    }
}

#[test]
fn test_segment_is_deterministic() {
    let text = "## 1. Setup\nInstall tools\n## 2. Run\n1. start\n2. stop\n| x |";
    assert_eq!(segment(text), segment(text));
}

#[test]
fn test_json_plan_beats_everything_else() {
    let doc = serde_json::json!({
        "pddl": {"plan": "## 1. Heading line\n1. numbered line"}
    })
    .to_string();

    let steps = segment(&doc);
    assert_eq!(steps, JsonPlan.segment(&doc));
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].section.as_deref(), Some("PDDL Plan"));
}

#[test]
fn test_action_blocks_beat_numbered_list() {
    let text = "```pddl\n(:action stack\n  :effect (on ?x ?y))\n```\n\n1. **Stack** puts x on y\n2. Done";
    let steps = segment(text);

    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].section.as_deref(), Some("PDDL Action: stack"));
    assert!(steps[0].content.contains("**Explanation:**\n1. **Stack** puts x on y"));
}

#[test]
fn test_headings_beat_table_and_list() {
    let text = "## 1. Prepare\n|---|---|---|\n| 1. Scout | a | b |\n## 2. Execute\n1. go";
    let steps = segment(text);

    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].section.as_deref(), Some("Prepare"));
    assert_eq!(steps[1].content, "## 2. Execute\n\n1. go");
}

#[test]
fn test_table_beats_numbered_list() {
    let text = "|---|---|---|\n| 1. Scout | a | b |\n\n1. other";
    let steps = segment(text);

    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].section.as_deref(), Some("Workflow"));
}

#[test]
fn test_step_ids_follow_numbers() {
    let steps = segment("4. four\n2. two");

    let ids: Vec<&str> = steps.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["step-4", "step-2"]);
}
