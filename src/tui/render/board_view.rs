use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::task::{Priority, Status, Task};
use crate::tui::app::App;
use crate::util::unicode::truncate_to_width;

use super::push_highlighted_spans;

/// Render the board view: one column per status over the same derived
/// tree, flattened. Hierarchy and collapse state don't apply here — the
/// board is a status grouping of everything the filter kept.
pub fn render_board_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let statuses = Status::all();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(area);

    let mut columns: Vec<Vec<&Task>> = vec![Vec::new(); statuses.len()];
    collect_by_status(&app.derived.tasks, &mut columns);

    let search_re = app.active_search_re();
    for (i, status) in statuses.into_iter().enumerate() {
        render_column(frame, app, chunks[i], status, &columns[i], search_re.as_ref());
    }
}

fn collect_by_status<'a>(tasks: &'a [Task], columns: &mut [Vec<&'a Task>]) {
    for task in tasks {
        columns[task.status as usize].push(task);
        collect_by_status(&task.children, columns);
    }
}

fn render_column(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    status: Status,
    tasks: &[&Task],
    search_re: Option<&regex::Regex>,
) {
    if area.width < 4 {
        return;
    }
    let bg = app.theme.background;
    let color = app.theme.status_color(status);
    let width = area.width as usize;

    let mut lines: Vec<Line> = Vec::with_capacity(tasks.len() + 2);

    // Header: status label + card count, underlined by the separator row
    lines.push(Line::from(Span::styled(
        format!(" {} {}", status.label(), tasks.len()),
        Style::default()
            .fg(color)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        "\u{2500}".repeat(width.saturating_sub(1)),
        Style::default().fg(app.theme.dim).bg(bg),
    )));

    let card_budget = width.saturating_sub(2);
    let max_cards = (area.height as usize).saturating_sub(2);
    for task in tasks.iter().take(max_cards) {
        let mut spans: Vec<Span> = vec![Span::styled(" ", Style::default().bg(bg))];
        if let Some(marker) = priority_marker(task.priority) {
            spans.push(Span::styled(
                marker,
                Style::default()
                    .fg(app.theme.priority_color(task.priority.unwrap_or(Priority::None)))
                    .bg(bg),
            ));
        }
        let name = truncate_to_width(&task.name, card_budget.saturating_sub(2));
        push_highlighted_spans(
            &mut spans,
            &name,
            Style::default().fg(app.theme.text).bg(bg),
            Style::default()
                .fg(app.theme.search_match_fg)
                .bg(app.theme.search_match_bg),
            search_re,
        );
        lines.push(Line::from(spans));
    }
    if tasks.len() > max_cards {
        lines.push(Line::from(Span::styled(
            format!(" +{} more", tasks.len() - max_cards),
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Urgency marker shown before a card's name
fn priority_marker(priority: Option<Priority>) -> Option<&'static str> {
    match priority {
        Some(Priority::Urgent) => Some("!! "),
        Some(Priority::High) => Some("! "),
        _ => None,
    }
}
