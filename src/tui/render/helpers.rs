use ratatui::text::Span;

use crate::model::task::Task;
use crate::util::unicode;

/// A row of the table view: a task in the derived tree plus its depth
pub(super) struct VisibleRow<'a> {
    pub task: &'a Task,
    pub depth: usize,
}

/// Flatten the derived tree to the rows actually rendered, in document
/// order. Children are reached only under an expanded node — the same rule
/// the pipeline's visible-id pass applies.
pub(super) fn visible_rows(tasks: &[Task]) -> Vec<VisibleRow<'_>> {
    fn walk<'a>(tasks: &'a [Task], depth: usize, out: &mut Vec<VisibleRow<'a>>) {
        for task in tasks {
            out.push(VisibleRow { task, depth });
            if task.is_expanded && task.has_children() {
                walk(&task.children, depth + 1, out);
            }
        }
    }
    let mut out = Vec::new();
    walk(tasks, 0, &mut out);
    out
}

/// Expand marker: parents show their state, leaves get a dot
pub(super) fn expand_marker(task: &Task) -> &'static str {
    if task.has_children() {
        if task.is_expanded { "\u{25BE}" } else { "\u{25B8}" }
    } else {
        "\u{00B7}"
    }
}

/// Comma-joined assignee initials for the assignees cell
pub(super) fn assignee_initials(task: &Task) -> String {
    task.assignees
        .iter()
        .map(|a| a.initials.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}
