//! Plain-text rendering of checklists, overviews and alerts for the CLI.

use crate::alerts::{Alert, AlertLevel};
use crate::calendar::{Month, MonthConfig};
use crate::models::MonthRecord;
use crate::path::{FieldPath, PlanningField, ReportingField, SprintField};
use crate::progress::{MemberOverview, Progress};

const DONE: char = '●';
const OPEN: char = '○';

fn mark(checked: bool) -> char {
    if checked {
        DONE
    } else {
        OPEN
    }
}

/// A line of the checklist tree. Checkable items carry a mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub label: String,
    pub checked: Option<bool>,
    pub children: Vec<Node>,
}

impl Node {
    fn branch(label: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            label: label.into(),
            checked: None,
            children,
        }
    }

    fn check(label: &str, checked: bool, path: FieldPath) -> Self {
        Self {
            label: format!("{label}  [{path}]"),
            checked: Some(checked),
            children: Vec::new(),
        }
    }

    fn text(label: &str, text: &str, path: FieldPath) -> Self {
        let shown = if text.is_empty() { "-" } else { text };
        Self {
            label: format!("{label}: {shown}  [{path}]"),
            checked: None,
            children: Vec::new(),
        }
    }
}

/// Render nodes as an ASCII tree.
///
/// ```text
/// Planning
/// ├── ● Calendar sent
/// └── ○ Customer sign-off
/// ```
pub fn render_tree(nodes: &[Node]) -> String {
    let mut output = String::new();
    for (i, node) in nodes.iter().enumerate() {
        let is_last = i == nodes.len() - 1;
        render_node(&mut output, node, "", is_last, true);
    }
    output
}

fn render_node(output: &mut String, node: &Node, prefix: &str, is_last: bool, is_root: bool) {
    if !is_root {
        output.push_str(prefix);
        output.push_str(if is_last { "└── " } else { "├── " });
    }
    if let Some(checked) = node.checked {
        output.push(mark(checked));
        output.push(' ');
    }
    output.push_str(&node.label);
    output.push('\n');

    let child_prefix = if is_root {
        String::new()
    } else {
        let continuation = if is_last { "    " } else { "│   " };
        format!("{prefix}{continuation}")
    };

    for (i, child) in node.children.iter().enumerate() {
        let child_is_last = i == node.children.len() - 1;
        render_node(output, child, &child_prefix, child_is_last, false);
    }
}

/// Checklist tree for one month record, sections in calendar order.
pub fn checklist_nodes(record: &MonthRecord, config: &MonthConfig) -> Vec<Node> {
    let planning = &record.planning;
    let codes = if planning.emotional_codes.selected.is_empty() {
        "-".to_string()
    } else {
        planning.emotional_codes.selected.iter().collect::<Vec<_>>().join(", ")
    };

    let mut nodes = vec![Node::branch(
        "Planning",
        vec![
            Node::check(
                "Narrative arc",
                planning.narrative_arc.done,
                FieldPath::Planning(PlanningField::NarrativeArcDone),
            ),
            Node::text(
                "Arc notes",
                &planning.narrative_arc.notes,
                FieldPath::Planning(PlanningField::NarrativeArcNotes),
            ),
            Node::check(
                "Emotional codes",
                planning.emotional_codes.done,
                FieldPath::Planning(PlanningField::EmotionalCodesDone),
            ),
            Node::text(
                "Selected codes",
                &codes,
                FieldPath::Planning(PlanningField::EmotionalCodesSelected),
            ),
            Node::check(
                "Capacity confirmed",
                planning.capacity_confirmed,
                FieldPath::Planning(PlanningField::CapacityConfirmed),
            ),
            Node::check(
                "Calendar sent",
                planning.calendar_sent,
                FieldPath::Planning(PlanningField::CalendarSent),
            ),
            Node::check(
                "Customer sign-off",
                planning.customer_signoff,
                FieldPath::Planning(PlanningField::CustomerSignoff),
            ),
        ],
    )];

    for window in config.sprint_windows {
        let Some(sprint) = record.sprints.get(window.label) else {
            continue;
        };
        let at = |field| FieldPath::sprint(window.label, field);
        nodes.push(Node::branch(
            format!("Sprint {} ({}, close {})", window.label, window.range, window.close),
            vec![
                Node::text("Scope", &sprint.scope_notes, at(SprintField::ScopeNotes)),
                Node::check("Scope locked", sprint.scope_locked, at(SprintField::ScopeLocked)),
                Node::check("All scheduled", sprint.all_scheduled, at(SprintField::AllScheduled)),
                Node::check("QA complete", sprint.qa_complete, at(SprintField::QaComplete)),
                Node::check("Zero typos", sprint.zero_typos, at(SprintField::ZeroTypos)),
                Node::check("Clean runway", sprint.clean_runway, at(SprintField::CleanRunway)),
            ],
        ));
    }

    for period in config.reporting_periods {
        let Some(report) = record.reporting.get(*period) else {
            continue;
        };
        let at = |field| FieldPath::reporting(*period, field);
        nodes.push(Node::branch(
            format!("Report {period}"),
            vec![
                Node::check(
                    "Performance signals",
                    report.performance_signals,
                    at(ReportingField::PerformanceSignals),
                ),
                Node::check(
                    "Qualitative wins",
                    report.qualitative_wins,
                    at(ReportingField::QualitativeWins),
                ),
                Node::check("Next steps", report.next_steps, at(ReportingField::NextSteps)),
                Node::text("Notes", &report.notes, at(ReportingField::Notes)),
            ],
        ));
    }

    nodes
}

pub fn render_progress(progress: &Progress) -> String {
    format!("{}/{} ({}%)", progress.done, progress.total, progress.percent)
}

/// Header line plus checklist tree for one member and month.
pub fn render_checklist(
    member: &str,
    month: Month,
    record: &MonthRecord,
    config: &MonthConfig,
    progress: &Progress,
) -> String {
    let mut output = format!("{member} · {month}  {}\n\n", render_progress(progress));
    for node in checklist_nodes(record, config) {
        output.push_str(&render_tree(std::slice::from_ref(&node)));
        output.push('\n');
    }
    output
}

/// One line per member with per-month progress; complete months are marked.
pub fn render_overview(rows: &[MemberOverview]) -> String {
    let mut output = String::new();
    for row in rows {
        output.push_str(&format!("{} ({})\n", row.member, row.customers.join(", ")));
        for (month, progress) in &row.months {
            output.push_str(&format!(
                "  {} {:<9} {}\n",
                mark(progress.is_complete()),
                month.as_str(),
                render_progress(progress)
            ));
        }
    }
    output
}

fn level_tag(level: AlertLevel) -> &'static str {
    match level {
        AlertLevel::Info => "[info]   ",
        AlertLevel::Warning => "[warning]",
        AlertLevel::Urgent => "[urgent] ",
    }
}

pub fn render_alerts(alerts: &[Alert]) -> String {
    alerts
        .iter()
        .map(|a| format!("{} {}\n", level_tag(a.level), a.message))
        .collect()
}

pub fn render_calendar(month: Month, config: &MonthConfig) -> String {
    let mut output = format!("{month}\n");
    for window in config.sprint_windows {
        output.push_str(&format!(
            "  Sprint {}: {} (close {})\n",
            window.label, window.range, window.close
        ));
    }
    output.push_str(&format!(
        "  Reporting: {}\n",
        config.reporting_periods.join(", ")
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::due_alerts;
    use crate::calendar::month_config;
    use chrono::NaiveDate;

    fn leaf(label: &str, checked: bool) -> Node {
        Node {
            label: label.to_string(),
            checked: Some(checked),
            children: vec![],
        }
    }

    #[test]
    fn test_single_root() {
        let output = render_tree(&[Node::branch("Planning", vec![])]);
        assert_eq!(output, "Planning\n");
    }

    #[test]
    fn test_with_children() {
        let tree = [Node::branch(
            "Planning",
            vec![leaf("Calendar sent", true), leaf("Customer sign-off", false)],
        )];
        assert_eq!(
            render_tree(&tree),
            "Planning\n├── ● Calendar sent\n└── ○ Customer sign-off\n"
        );
    }

    #[test]
    fn test_nested_children() {
        let tree = [Node::branch(
            "Quarter",
            vec![
                Node::branch("January", vec![leaf("Sprint W3-4", true)]),
                leaf("February", false),
            ],
        )];
        let expected = "Quarter\n├── January\n│   └── ● Sprint W3-4\n└── ○ February\n";
        assert_eq!(render_tree(&tree), expected);
    }

    #[test]
    fn test_checklist_follows_config_order() {
        let config = month_config(Month::February);
        let record = MonthRecord::from_config(&config);
        let labels: Vec<_> = checklist_nodes(&record, &config)
            .into_iter()
            .map(|n| n.label)
            .collect();
        assert_eq!(labels[0], "Planning");
        assert!(labels[1].starts_with("Sprint W1-2"));
        assert!(labels[2].starts_with("Sprint W3-4"));
        assert_eq!(labels[3], "Report 1st-2nd Week");
        assert_eq!(labels[4], "Report 3rd-4th Week");
    }

    #[test]
    fn test_check_labels_carry_their_path() {
        let config = month_config(Month::January);
        let record = MonthRecord::from_config(&config);
        let nodes = checklist_nodes(&record, &config);
        assert_eq!(
            nodes[1].children[1].label,
            "Scope locked  [sprints.W3-4.scopeLocked]"
        );
        assert_eq!(nodes[2].children[3].label, "Notes: -  [reporting.Monthly.notes]");
    }

    #[test]
    fn test_render_alerts() {
        // 2025-03-21 is a Friday.
        let alerts = due_alerts(&NaiveDate::from_ymd_opt(2025, 3, 21).unwrap());
        assert_eq!(
            render_alerts(&alerts),
            "[urgent]  Customer sign-off must be locked by 23rd\n\
             [urgent]  SPRINT CLOSE: All content must be scheduled by 3pm today\n"
        );
    }
}
