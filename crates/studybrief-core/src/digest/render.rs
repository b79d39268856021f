//! Plain-text rendering of a study brief
//!
//! The body is a fixed sequence of sections; empty sections print a
//! placeholder line instead of disappearing, so the email always has the
//! same layout.

use super::Brief;

const RULE: &str = "================================";

/// Email subject, with the focus priority when the plan sets one
pub fn subject(exam_label: &str, focus_priority: &str) -> String {
    if focus_priority.is_empty() {
        format!("{} — Daily Study Brief", exam_label)
    } else {
        format!("{} — Daily Study Brief ({})", exam_label, focus_priority)
    }
}

/// Email body. Lines are joined with `\n`, without a trailing newline.
pub fn body(brief: &Brief) -> String {
    let plan = &brief.plan;
    let mut lines: Vec<String> = vec![
        format!("{} DAILY STUDY BRIEF", brief.exam_label),
        format!("Date: {}", brief.date),
        format!("Phase: {}", plan.phase),
        format!("Priority: {}", plan.focus_priority),
    ];

    section(&mut lines, "TODAY'S STUDY SESSIONS");
    lines.push("SESSION 1 — LEARN (1 hour)".to_string());
    lines.push(or_placeholder(&plan.session1, "(No details)"));
    lines.push("Resources (IDs/URLs):".to_string());
    lines.push(or_placeholder(&plan.session1_resources, "(None)"));
    lines.push(String::new());
    lines.push("SESSION 2 — LAB / PRACTICE (1 hour)".to_string());
    lines.push(or_placeholder(&plan.session2, "(No details)"));
    lines.push("Resources (IDs/URLs):".to_string());
    lines.push(or_placeholder(&plan.session2_resources, "(None)"));

    section(&mut lines, "TODAY'S OBJECTIVES");
    if brief.objectives.is_empty() {
        lines.push("(No objectives found)".to_string());
    }
    for objective in &brief.objectives {
        let details: Vec<String> = [
            ("Exam Area", &objective.exam_area),
            ("Skill", &objective.skill_group),
            ("Priority", &objective.priority),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect();

        let mut line = format!("- {} — {}", objective.id, objective.description);
        if !details.is_empty() {
            line.push_str(&format!(" ({})", details.join(" | ")));
        }
        lines.push(line);
    }

    section(&mut lines, "KEY RESOURCES");
    if brief.resources.is_empty() {
        lines.push("(No resources found)".to_string());
    }
    for resource in &brief.resources {
        lines.push(format!(
            "- {} — {} ({})",
            resource.id, resource.name, resource.kind
        ));
        if !resource.url.is_empty() {
            lines.push(format!("  URL: {}", resource.url));
        }
        if !resource.why.is_empty() {
            lines.push(format!("  Why: {}", resource.why));
        }
    }

    section(&mut lines, "PRACTICE TEST (IF ANY)");
    match &brief.practice_test {
        Some(test) => {
            lines.push(format!("{} — {}", test.provider, test.test));
            if !test.focus.is_empty() {
                lines.push(format!("Focus: {}", test.focus));
            }
            if !test.notes.is_empty() {
                lines.push(format!("Notes: {}", test.notes));
            }
        }
        None => lines.push("(No practice test scheduled for today)".to_string()),
    }

    section(&mut lines, "OPEN MISTAKES (IF ANY)");
    if brief.mistakes.is_empty() {
        lines.push("(No open mistakes for today's objectives)".to_string());
    }
    for mistake in &brief.mistakes {
        lines.push(format!("- Mistake: {}", mistake.summary));
        if !mistake.rule.is_empty() {
            lines.push(format!("  Rule: {}", mistake.rule));
        }
        if !mistake.tip.is_empty() {
            lines.push(format!("  Tip: {}", mistake.tip));
        }
    }

    section(&mut lines, "COMPLETION CHECKLIST");
    lines.push("[ ] Session 1 Done".to_string());
    lines.push("[ ] Session 2 Done".to_string());

    lines.join("\n")
}

/// Blank line, then the heading framed by rules
fn section(lines: &mut Vec<String>, heading: &str) {
    lines.push(String::new());
    lines.push(RULE.to_string());
    lines.push(heading.to_string());
    lines.push(RULE.to_string());
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}
