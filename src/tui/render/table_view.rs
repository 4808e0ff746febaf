use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::view::{SortDirection, SortSpec};
use crate::pipeline::field::Column;
use crate::tui::app::App;
use crate::tui::theme::parse_hex_color;
use crate::util::unicode::{display_width, fit_to_width, truncate_to_width};

use super::helpers::{assignee_initials, expand_marker, spans_width, visible_rows};
use super::push_highlighted_spans;

const ROW_NUM_W: usize = 4;
const STATUS_W: usize = 13;
const PRIORITY_W: usize = 9;
const DUE_W: usize = 12;
const ASSIGNEES_W: usize = 9;
const PROGRESS_W: usize = 5;

/// Which optional columns fit the terminal, and the width left for names
struct ColumnPlan {
    status: bool,
    priority: bool,
    due: bool,
    assignees: bool,
    progress: bool,
    name_w: usize,
}

fn plan_columns(width: usize) -> ColumnPlan {
    let mut plan = ColumnPlan {
        status: width >= 50,
        priority: width >= 64,
        due: width >= 76,
        assignees: width >= 86,
        progress: width >= 92,
        name_w: 0,
    };
    let mut fixed = ROW_NUM_W + 2;
    if plan.status {
        fixed += STATUS_W;
    }
    if plan.priority {
        fixed += PRIORITY_W;
    }
    if plan.due {
        fixed += DUE_W;
    }
    if plan.assignees {
        fixed += ASSIGNEES_W;
    }
    if plan.progress {
        fixed += PROGRESS_W;
    }
    plan.name_w = width.saturating_sub(fixed).max(10);
    plan
}

/// Render the table view: header row, then the visible rows of the derived
/// tree with stable row numbers and tree indentation.
pub fn render_table_view(frame: &mut Frame, app: &mut App, area: Rect) {
    if area.height == 0 {
        return;
    }
    let width = area.width as usize;
    let plan = plan_columns(width);
    let visible_height = area.height.saturating_sub(1) as usize;

    // Keep the cursor inside the scrolled window
    {
        let cursor = app.cursor();
        let state = app.view_state_mut();
        if cursor < state.scroll_offset {
            state.scroll_offset = cursor;
        } else if visible_height > 0 && cursor >= state.scroll_offset + visible_height {
            state.scroll_offset = cursor + 1 - visible_height;
        }
    }

    let cursor = app.cursor();
    let scroll = app
        .view_states
        .get(app.active_view_id())
        .map_or(0, |s| s.scroll_offset);

    let mut lines: Vec<Line> = Vec::with_capacity(visible_height + 1);
    lines.push(header_line(app, &plan));

    let rows = visible_rows(&app.derived.tasks);
    if rows.is_empty() {
        let msg = if app.active_search().is_empty() && app.active_view().filters.is_empty() {
            " No tasks — add one with `td add`"
        } else {
            " no matching tasks"
        };
        lines.push(Line::from(Span::styled(
            msg,
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        )));
        let empty = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
        frame.render_widget(empty, area);
        return;
    }

    let search_re = app.active_search_re();
    let end = rows.len().min(scroll + visible_height);
    for (row, idx) in rows[scroll..end].iter().zip(scroll..end) {
        let mut spans: Vec<Span> = Vec::new();
        let is_cursor = idx == cursor;

        // Per-row style override, trumped by the cursor bar
        let style = row.task.style.as_ref();
        let bg = if is_cursor {
            app.theme.selection_bg
        } else {
            style
                .and_then(|s| s.background.as_deref())
                .and_then(parse_hex_color)
                .unwrap_or(app.theme.background)
        };
        let fg = style
            .and_then(|s| s.text.as_deref())
            .and_then(parse_hex_color)
            .unwrap_or(app.theme.text);
        let cell = |text: String, color: Color| Span::styled(text, Style::default().fg(color).bg(bg));

        let row_number = app
            .derived
            .row_numbers
            .get(&row.task.id)
            .copied()
            .unwrap_or(0);
        spans.push(cell(
            format!("{:>w$}  ", row_number, w = ROW_NUM_W),
            app.theme.dim,
        ));

        // Name cell: indent, expand marker, highlighted name, padding
        let indent = "  ".repeat(row.depth);
        spans.push(cell(
            format!("{}{} ", indent, expand_marker(row.task)),
            app.theme.dim,
        ));
        let name_budget = plan
            .name_w
            .saturating_sub(display_width(&indent) + 2)
            .max(4);
        let name = truncate_to_width(&row.task.name, name_budget);
        let name_style = if is_cursor {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(fg).bg(bg)
        };
        let match_style = Style::default()
            .fg(app.theme.search_match_fg)
            .bg(app.theme.search_match_bg);
        push_highlighted_spans(&mut spans, &name, name_style, match_style, search_re.as_ref());
        let used = display_width(&indent) + 2 + display_width(&name);
        if used < plan.name_w {
            spans.push(cell(" ".repeat(plan.name_w - used), fg));
        }

        if plan.status {
            spans.push(cell(
                fit_to_width(row.task.status.label(), STATUS_W),
                app.theme.status_color(row.task.status),
            ));
        }
        if plan.priority {
            let (text, color) = match row.task.priority {
                Some(p) => (p.as_str().to_string(), app.theme.priority_color(p)),
                None => (String::new(), app.theme.dim),
            };
            spans.push(cell(fit_to_width(&text, PRIORITY_W), color));
        }
        if plan.due {
            let due = row.task.due_date.as_deref().unwrap_or("");
            spans.push(cell(fit_to_width(due, DUE_W), app.theme.text));
        }
        if plan.assignees {
            spans.push(cell(
                fit_to_width(&assignee_initials(row.task), ASSIGNEES_W),
                app.theme.cyan,
            ));
        }
        if plan.progress {
            let text = match &row.task.progress {
                Some(p) => format!("{:>3}%", p.percent),
                None => String::new(),
            };
            spans.push(cell(fit_to_width(&text, PROGRESS_W), app.theme.green));
        }

        // Extend the cursor bar (or a styled row's background) to the edge
        let used = spans_width(&spans);
        if used < width && bg != app.theme.background {
            spans.push(cell(" ".repeat(width - used), fg));
        }

        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, area);
}

fn header_line<'a>(app: &App, plan: &ColumnPlan) -> Line<'a> {
    let style = Style::default()
        .fg(app.theme.dim)
        .bg(app.theme.background)
        .add_modifier(Modifier::BOLD);
    let sort = app.active_view().sort.as_ref();

    let mut spans = vec![Span::styled(
        format!("{:>w$}  ", "#", w = ROW_NUM_W),
        style,
    )];
    spans.push(Span::styled(
        header_cell("Name", "name", sort, plan.name_w),
        style,
    ));
    if plan.status {
        spans.push(Span::styled(
            header_cell("Status", "status", sort, STATUS_W),
            style,
        ));
    }
    if plan.priority {
        spans.push(Span::styled(
            header_cell("Priority", "priority", sort, PRIORITY_W),
            style,
        ));
    }
    if plan.due {
        spans.push(Span::styled(
            header_cell("Due", "due_date", sort, DUE_W),
            style,
        ));
    }
    if plan.assignees {
        spans.push(Span::styled(
            header_cell("Who", "assignees", sort, ASSIGNEES_W),
            style,
        ));
    }
    if plan.progress {
        spans.push(Span::styled(
            header_cell("Prog", "progress", sort, PROGRESS_W),
            style,
        ));
    }
    Line::from(spans)
}

/// A fixed-width header cell, marked with the sort arrow when this column
/// carries the view's sort rule (column ids compare through the accessor
/// registry, so saved camelCase spellings still line up).
fn header_cell(title: &str, column: &str, sort: Option<&SortSpec>, width: usize) -> String {
    let mut text = title.to_string();
    if let Some(spec) = sort
        && Column::parse(&spec.column).is_some_and(|c| Some(c) == Column::parse(column))
    {
        text.push_str(match spec.direction {
            SortDirection::Asc => " \u{25B2}",
            SortDirection::Desc => " \u{25BC}",
        });
    }
    fit_to_width(&text, width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::view::SortSpec;
    use crate::tui::render::test_helpers::{
        TERM_H, TERM_W, app_with_tasks, render_to_string, sample_tasks,
    };

    fn render_table(app: &mut App) -> String {
        render_to_string(TERM_W, TERM_H, |frame, area| {
            render_table_view(frame, app, area);
        })
    }

    #[test]
    fn rows_carry_stable_numbers_and_indentation() {
        let mut app = app_with_tasks(sample_tasks());
        let text = render_table(&mut app);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].contains("#"));
        assert!(lines[0].contains("Name"));
        assert!(lines[1].starts_with("   1  \u{25BE} Website redesign"));
        assert!(lines[2].starts_with("   2    \u{00B7} Draft wireframes"));
        assert!(lines[3].starts_with("   3    \u{00B7} Review copy"));
        assert!(lines[4].starts_with("   4  \u{00B7} Data migration"));
    }

    #[test]
    fn collapsed_subtree_keeps_sibling_numbering() {
        let mut app = app_with_tasks(sample_tasks());
        app.project.tasks[0].is_expanded = false;
        app.refresh();

        let text = render_table(&mut app);
        assert!(text.contains("\u{25B8} Website redesign"));
        assert!(!text.contains("Draft wireframes"));
        // The sibling keeps row number 4 even with rows 2-3 hidden
        assert!(text.lines().nth(2).unwrap().starts_with("   4  "));
    }

    #[test]
    fn status_cells_render_labels() {
        let mut app = app_with_tasks(sample_tasks());
        let text = render_table(&mut app);
        assert!(text.contains("In Progress"));
        assert!(text.contains("In Review"));
        assert!(text.contains("Completed"));
    }

    #[test]
    fn sorted_column_shows_the_direction_arrow() {
        let mut app = app_with_tasks(sample_tasks());
        app.project.views[0].sort = Some(SortSpec {
            column: "dueDate".into(),
            direction: SortDirection::Desc,
        });
        app.refresh();

        let text = render_table(&mut app);
        assert!(text.lines().next().unwrap().contains("Due \u{25BC}"));
    }

    #[test]
    fn empty_filter_result_shows_a_notice() {
        let mut app = app_with_tasks(sample_tasks());
        app.search = "zzz-no-match".into();
        app.refresh();

        let text = render_table(&mut app);
        assert!(text.contains("no matching tasks"));
    }

    #[test]
    fn narrow_terminals_drop_trailing_columns() {
        let mut app = app_with_tasks(sample_tasks());
        let text = render_to_string(48, TERM_H, |frame, area| {
            render_table_view(frame, &mut app, area);
        });
        let header = text.lines().next().unwrap().to_string();
        assert!(header.contains("Name"));
        assert!(!header.contains("Status"));
        // Names still render
        assert!(text.contains("Website redesign"));
    }
}
