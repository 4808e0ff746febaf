use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::stats;
use crate::tui::app::{App, Mode};
use crate::util::unicode::display_width;

/// Render the status row (bottom of screen): project stats and transient
/// messages while navigating, the search prompt while typing.
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let line = match app.mode {
        Mode::Navigate => {
            let left = match &app.status_message {
                Some(msg) => msg.clone(),
                None => {
                    let today = chrono::Local::now().date_naive();
                    let stats = stats::compute_stats(&app.project.tasks, today);
                    format!(
                        " {} tasks \u{00B7} {}% done \u{00B7} {} overdue",
                        stats.counts.total(),
                        stats.done_percent(),
                        stats.overdue
                    )
                }
            };
            let mut spans = vec![Span::styled(
                left,
                Style::default().fg(app.theme.dim).bg(bg),
            )];

            let mut hint = String::new();
            if !app.search.is_empty() {
                hint.push_str(&format!("/{}  ", app.search));
            }
            if app.project.config.ui.show_key_hints {
                hint.push_str("j/k move  x fold  / search  s sort  ");
            }
            hint.push_str("? help");
            pad_between(&mut spans, &hint, width, app);
            Line::from(spans)
        }
        Mode::Search => {
            // Search prompt with a movable block cursor: /dra▌ft
            let (before, after) = app.search_input.split_at(app.search_cursor);
            let mut spans = vec![
                Span::styled(
                    format!("/{}", before),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled(
                    "\u{258C}",
                    Style::default().fg(app.theme.highlight).bg(bg),
                ),
                Span::styled(
                    after.to_string(),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
            ];
            let hint = format!(
                "{} rows  Enter keep  Esc cancel",
                app.derived.visible_len()
            );
            pad_between(&mut spans, &hint, width, app);
            Line::from(spans)
        }
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Right-align a dim hint after the existing spans, padding with spaces
fn pad_between(spans: &mut Vec<Span>, hint: &str, width: usize, app: &App) {
    let bg = app.theme.background;
    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_width = display_width(hint);
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(
            hint.to_string(),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }
}
