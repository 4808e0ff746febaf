use serde::Serialize;

use crate::model::task::{Impact, Priority, Status, Task};
use crate::model::view::{FilterOperator, ViewConfig};
use crate::ops::search::SearchHit;
use crate::ops::stats::DeckStats;
use crate::pipeline::DerivedView;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct RowJson {
    pub row: usize,
    pub id: u64,
    pub depth: usize,
    pub name: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
}

#[derive(Serialize)]
pub struct ListJson {
    pub view: String,
    /// Rows in the derived tree, collapsed or not
    pub total: usize,
    /// Rows currently visible given expand state
    pub visible: usize,
    pub rows: Vec<RowJson>,
}

#[derive(Serialize)]
pub struct StatsJson {
    pub new: usize,
    pub planned: usize,
    pub in_progress: usize,
    pub in_review: usize,
    pub completed: usize,
    pub total: usize,
    pub done_percent: usize,
    pub overdue: usize,
}

#[derive(Serialize)]
pub struct SearchHitJson {
    pub task_id: u64,
    pub field: String,
    pub matches: usize,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Walk the derived tree in document order, yielding visible rows with
/// their depth. Mirrors the pipeline's visibility rule: children are
/// reached only under an expanded node.
pub fn visible_rows(tasks: &[Task]) -> Vec<(&Task, usize)> {
    fn walk<'a>(tasks: &'a [Task], depth: usize, out: &mut Vec<(&'a Task, usize)>) {
        for task in tasks {
            out.push((task, depth));
            if task.is_expanded && task.has_children() {
                walk(&task.children, depth + 1, out);
            }
        }
    }
    let mut out = Vec::new();
    walk(tasks, 0, &mut out);
    out
}

pub fn list_to_json(view_id: &str, derived: &DerivedView) -> ListJson {
    let rows = visible_rows(&derived.tasks)
        .into_iter()
        .map(|(task, depth)| RowJson {
            row: derived.row_numbers[&task.id],
            id: task.id,
            depth,
            name: task.name.clone(),
            status: task.status,
            priority: task.priority,
            due_date: task.due_date.clone(),
            assignees: task.assignees.iter().map(|a| a.name.clone()).collect(),
            progress: task.progress.as_ref().map(|p| p.percent),
        })
        .collect();
    ListJson {
        view: view_id.to_string(),
        total: derived.total_len(),
        visible: derived.visible_len(),
        rows,
    }
}

pub fn stats_to_json(stats: &DeckStats) -> StatsJson {
    StatsJson {
        new: stats.counts.new,
        planned: stats.counts.planned,
        in_progress: stats.counts.in_progress,
        in_review: stats.counts.in_review,
        completed: stats.counts.completed,
        total: stats.counts.total(),
        done_percent: stats.done_percent(),
        overdue: stats.overdue,
    }
}

pub fn hit_to_json(hit: &SearchHit) -> SearchHitJson {
    SearchHitJson {
        task_id: hit.task_id,
        field: hit.field.as_str().to_string(),
        matches: hit.spans.len(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Expand marker: parents show their state, leaves get a dot
fn expand_marker(task: &Task) -> char {
    if task.has_children() {
        if task.is_expanded { '\u{25BE}' } else { '\u{25B8}' }
    } else {
        '\u{00B7}'
    }
}

/// Format one visible row: stable row number, tree indentation, name,
/// then the fields that are actually set.
pub fn format_row_line(row: usize, depth: usize, task: &Task) -> String {
    let mut line = format!(
        "{:>4}  {}{} {}",
        row,
        "  ".repeat(depth),
        expand_marker(task),
        task.name
    );
    line.push_str(&format!("  [{}]", task.status.label()));
    if let Some(priority) = task.priority {
        line.push_str(&format!(" !{}", priority.as_str()));
    }
    if let Some(due) = &task.due_date {
        line.push_str(&format!(" due {}", due));
    }
    if !task.assignees.is_empty() {
        let initials: Vec<&str> = task.assignees.iter().map(|a| a.initials.as_str()).collect();
        line.push_str(&format!(" @{}", initials.join(",")));
    }
    if let Some(progress) = &task.progress {
        line.push_str(&format!(" {}%", progress.percent));
    }
    line
}

/// Format every visible row of a derived view
pub fn format_rows(derived: &DerivedView) -> Vec<String> {
    visible_rows(&derived.tasks)
        .iter()
        .map(|(task, depth)| format_row_line(derived.row_numbers[&task.id], *depth, task))
        .collect()
}

/// Format detailed task view
pub fn format_task_detail(task: &Task) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("#{} {}", task.id, task.name));
    lines.push(format!("status: {}", task.status.label()));
    if let Some(priority) = task.priority {
        lines.push(format!("priority: {}", priority.as_str()));
    }
    if let Some(impact) = task.impact {
        lines.push(format!("impact: {}", impact.as_str()));
    }
    if let Some(start) = &task.start_date {
        lines.push(format!("start: {}", start));
    }
    if let Some(due) = &task.due_date {
        lines.push(format!("due: {}", due));
    }
    if let Some(progress) = &task.progress {
        if progress.history.is_empty() {
            lines.push(format!("progress: {}%", progress.percent));
        } else {
            let history: Vec<String> =
                progress.history.iter().map(|p| p.to_string()).collect();
            lines.push(format!(
                "progress: {}% (history: {})",
                progress.percent,
                history.join(", ")
            ));
        }
    }
    if !task.assignees.is_empty() {
        let names: Vec<String> = task
            .assignees
            .iter()
            .map(|a| format!("{} ({})", a.name, a.initials))
            .collect();
        lines.push(format!("assignees: {}", names.join(", ")));
    }
    if !task.health.is_empty() {
        lines.push("health:".to_string());
        for indicator in &task.health {
            let status = match indicator.status {
                crate::model::task::HealthStatus::Complete => "complete",
                crate::model::task::HealthStatus::AtRisk => "at_risk",
                crate::model::task::HealthStatus::Blocked => "blocked",
            };
            if indicator.detail.is_empty() {
                lines.push(format!("  - {} [{}]", indicator.label, status));
            } else {
                lines.push(format!(
                    "  - {} [{}] {}",
                    indicator.label, status, indicator.detail
                ));
            }
        }
    }
    if !task.children.is_empty() {
        lines.push(String::new());
        lines.push("subtasks:".to_string());
        for child in &task.children {
            format_subtask_tree(child, 1, &mut lines);
        }
    }

    lines
}

fn format_subtask_tree(task: &Task, indent: usize, lines: &mut Vec<String>) {
    lines.push(format!(
        "{}#{} {} [{}]",
        "  ".repeat(indent),
        task.id,
        task.name,
        task.status.label()
    ));
    for child in &task.children {
        format_subtask_tree(child, indent + 1, lines);
    }
}

/// Format one view for the views listing
pub fn format_view_line(view: &ViewConfig) -> String {
    let mut line = format!("  {} \"{}\" [{}]", view.id, view.name, view.kind);
    if !view.filters.is_empty() {
        let word = if view.filters.len() == 1 { "filter" } else { "filters" };
        line.push_str(&format!("  {} {}", view.filters.len(), word));
    }
    if let Some(sort) = &view.sort {
        let dir = match sort.direction {
            crate::model::view::SortDirection::Asc => "asc",
            crate::model::view::SortDirection::Desc => "desc",
        };
        line.push_str(&format!("  sort {} {}", sort.column, dir));
    }
    line
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

pub fn parse_status(s: &str) -> Result<Status, String> {
    Status::parse(s).ok_or_else(|| {
        format!(
            "unknown status '{}' (expected: new, planned, in_progress, in_review, completed)",
            s
        )
    })
}

pub fn parse_priority(s: &str) -> Result<Priority, String> {
    Priority::parse(s).ok_or_else(|| {
        format!(
            "unknown priority '{}' (expected: urgent, high, medium, low, none)",
            s
        )
    })
}

pub fn parse_impact(s: &str) -> Result<Impact, String> {
    match s {
        "high" => Ok(Impact::High),
        "medium" => Ok(Impact::Medium),
        "low" => Ok(Impact::Low),
        _ => Err(format!(
            "unknown impact '{}' (expected: high, medium, low)",
            s
        )),
    }
}

pub fn parse_operator(s: &str) -> Result<FilterOperator, String> {
    match s {
        "contains" => Ok(FilterOperator::Contains),
        "not_contains" => Ok(FilterOperator::NotContains),
        "is" => Ok(FilterOperator::Is),
        "is_not" => Ok(FilterOperator::IsNot),
        "is_empty" => Ok(FilterOperator::IsEmpty),
        "is_not_empty" => Ok(FilterOperator::IsNotEmpty),
        "is_any_of" => Ok(FilterOperator::IsAnyOf),
        "is_none_of" => Ok(FilterOperator::IsNoneOf),
        _ => Err(format!(
            "unknown operator '{}' (expected: contains, not_contains, is, is_not, is_empty, is_not_empty, is_any_of, is_none_of)",
            s
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Assignee, Progress};
    use crate::model::view::{SortDirection, SortSpec, ViewKind};
    use crate::pipeline;
    use insta::assert_snapshot;

    fn sample_tree() -> Vec<Task> {
        let mut root = Task::new(1, "Website redesign");
        root.status = Status::InProgress;
        root.priority = Some(Priority::High);
        root.due_date = Some("28/02/2026".into());
        root.assignees.push(Assignee {
            id: 1,
            name: "Dana Reyes".into(),
            initials: "DR".into(),
            color: "#44DDFF".into(),
        });
        root.progress = Some(Progress {
            percent: 40,
            history: vec![10, 25],
        });

        let mut child = Task::new(2, "Draft wireframes");
        child.status = Status::InReview;
        root.children.push(child);
        let mut collapsed = Task::new(3, "Content audit");
        collapsed.is_expanded = false;
        collapsed.children.push(Task::new(4, "Inventory pages"));
        vec![root, collapsed]
    }

    #[test]
    fn row_lines_carry_stable_numbers_and_indentation() {
        let view = ViewConfig::new("all", "All Tasks", ViewKind::Table);
        let derived = pipeline::derive_view(&sample_tree(), &view, "");
        let lines = format_rows(&derived);

        assert_eq!(
            lines,
            vec![
                "   1  \u{25BE} Website redesign  [In Progress] !high due 28/02/2026 @DR 40%",
                "   2    \u{00B7} Draft wireframes  [In Review]",
                "   3  \u{25B8} Content audit  [New]",
            ]
        );
    }

    #[test]
    fn collapsed_rows_are_hidden_but_keep_numbering() {
        let view = ViewConfig::new("all", "All Tasks", ViewKind::Table);
        let derived = pipeline::derive_view(&sample_tree(), &view, "");
        // Task 4 is numbered even though its parent is collapsed
        assert_eq!(derived.row_numbers[&4], 4);
        let json = list_to_json("all", &derived);
        assert_eq!(json.total, 4);
        assert_eq!(json.visible, 3);
        assert!(json.rows.iter().all(|r| r.id != 4));
    }

    #[test]
    fn detail_lists_only_present_fields() {
        let tree = sample_tree();
        let lines = format_task_detail(&tree[0]);
        assert_snapshot!(lines.join("\n"), @r"
        #1 Website redesign
        status: In Progress
        priority: high
        due: 28/02/2026
        progress: 40% (history: 10, 25)
        assignees: Dana Reyes (DR)

        subtasks:
          #2 Draft wireframes [In Review]
        ");
    }

    #[test]
    fn view_line_shows_filters_and_sort() {
        let mut view = ViewConfig::new("sprint", "Sprint 12", ViewKind::Table);
        assert_eq!(format_view_line(&view), "  sprint \"Sprint 12\" [table]");

        view.filters.push(crate::model::view::FilterRule::new(
            "status",
            FilterOperator::IsNot,
            "completed",
        ));
        view.sort = Some(SortSpec {
            column: "due_date".into(),
            direction: SortDirection::Desc,
        });
        assert_eq!(
            format_view_line(&view),
            "  sprint \"Sprint 12\" [table]  1 filter  sort due_date desc"
        );
    }

    #[test]
    fn parsers_reject_unknown_values() {
        assert_eq!(parse_status("planned"), Ok(Status::Planned));
        assert!(parse_status("active").is_err());
        assert_eq!(parse_priority("urgent"), Ok(Priority::Urgent));
        assert!(parse_priority("critical").is_err());
        assert_eq!(parse_operator("is_any_of"), Ok(FilterOperator::IsAnyOf));
        assert!(parse_operator("starts_with").is_err());
    }
}
