use crossterm::event::{KeyCode, KeyEvent};

use crate::model::task::find_task;
use crate::ops::{task_ops, view_ops};
use crate::tui::app::{App, Mode, parent_of};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Help overlay intercepts its own keys
    if app.show_help {
        match key.code {
            KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
                app.show_help = false;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                app.help_scroll = app.help_scroll.saturating_add(1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            _ => {}
        }
        return;
    }

    // Sort prefix key: 's' was pressed, the next key picks the column
    if app.sort_pending {
        app.sort_pending = false;
        app.status_message = None;
        handle_sort_key(app, key);
        return;
    }

    app.status_message = None;

    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('?') => {
            app.show_help = true;
            app.help_scroll = 0;
        }

        // Cursor movement over the visible rows
        KeyCode::Char('j') | KeyCode::Down => {
            app.set_cursor(app.cursor() + 1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.set_cursor(app.cursor().saturating_sub(1));
        }
        KeyCode::Char('g') | KeyCode::Home => {
            app.set_cursor(0);
        }
        KeyCode::Char('G') | KeyCode::End => {
            app.set_cursor(app.derived.visible_len().saturating_sub(1));
        }

        // Expansion
        KeyCode::Char('x') => toggle_expanded(app),
        KeyCode::Char('h') | KeyCode::Left => collapse_or_parent(app),
        KeyCode::Char('l') | KeyCode::Right => expand_or_descend(app),
        KeyCode::Char('z') => set_all_expanded(app, false),
        KeyCode::Char('Z') => set_all_expanded(app, true),

        // View switching
        KeyCode::Tab => app.cycle_view(1),
        KeyCode::BackTab => app.cycle_view(-1),
        KeyCode::Char(c @ '1'..='9') => {
            app.select_view(c as usize - '1' as usize);
        }

        // Search
        KeyCode::Char('/') => {
            app.mode = Mode::Search;
            app.search_input = app.search.clone();
            app.search_cursor = app.search_input.len();
        }
        KeyCode::Esc => {
            if !app.search.is_empty() {
                app.search.clear();
                app.refresh();
            }
        }

        // Sort prefix
        KeyCode::Char('s') => {
            app.sort_pending = true;
            app.status_message = Some(
                "sort: n)ame s)tatus p)riority i)mpact a)ssignees b)egin d)ue g)progress x off"
                    .to_string(),
            );
        }

        _ => {}
    }
}

/// Second key of the `s` prefix: pick the sort column (cycling asc → desc
/// → off on repeats) or clear the rule with `x`.
fn handle_sort_key(app: &mut App, key: KeyEvent) {
    let column = match key.code {
        KeyCode::Char('n') => "name",
        KeyCode::Char('s') => "status",
        KeyCode::Char('p') => "priority",
        KeyCode::Char('i') => "impact",
        KeyCode::Char('a') => "assignees",
        KeyCode::Char('b') => "start_date",
        KeyCode::Char('d') => "due_date",
        KeyCode::Char('g') => "progress",
        KeyCode::Char('x') => {
            let id = app.active_view_id().to_string();
            let _ = view_ops::set_sort(&mut app.project.views, &id, None);
            app.dirty_views = true;
            app.refresh();
            app.status_message = Some("sort off".to_string());
            return;
        }
        _ => return,
    };

    let id = app.active_view_id().to_string();
    let _ = view_ops::toggle_sort(&mut app.project.views, &id, column);
    app.dirty_views = true;
    app.refresh();

    app.status_message = Some(match &app.active_view().sort {
        Some(spec) => {
            let dir = match spec.direction {
                crate::model::view::SortDirection::Asc => "asc",
                crate::model::view::SortDirection::Desc => "desc",
            };
            format!("sort {} {}", spec.column, dir)
        }
        None => "sort off".to_string(),
    });
}

/// Toggle the cursor row's expansion. Leaves are skipped; the cursor stays
/// on the same task across the re-derive.
fn toggle_expanded(app: &mut App) {
    let Some(id) = app.cursor_task_id() else {
        return;
    };
    if !find_task(&app.derived.tasks, id).is_some_and(|t| t.has_children()) {
        return;
    }
    let _ = task_ops::toggle_expanded(&mut app.project.tasks, id);
    app.dirty_tasks = true;
    app.refresh();
    app.move_cursor_to(id);
}

/// h: collapse an expanded parent, otherwise jump to the parent row
fn collapse_or_parent(app: &mut App) {
    let Some(id) = app.cursor_task_id() else {
        return;
    };
    let is_open_parent =
        find_task(&app.derived.tasks, id).is_some_and(|t| t.has_children() && t.is_expanded);
    if is_open_parent {
        toggle_expanded(app);
    } else if let Some(parent) = parent_of(&app.derived.tasks, id) {
        app.move_cursor_to(parent);
    }
}

/// l: expand a collapsed parent, otherwise step onto the first child
fn expand_or_descend(app: &mut App) {
    let Some(id) = app.cursor_task_id() else {
        return;
    };
    let Some(task) = find_task(&app.derived.tasks, id) else {
        return;
    };
    if !task.has_children() {
        return;
    }
    if task.is_expanded {
        // First child is the next visible row
        app.set_cursor(app.cursor() + 1);
    } else {
        toggle_expanded(app);
    }
}

fn set_all_expanded(app: &mut App, expanded: bool) {
    let Some(id) = app.cursor_task_id() else {
        task_ops::set_all_expanded(&mut app.project.tasks, expanded);
        app.dirty_tasks = true;
        app.refresh();
        return;
    };
    task_ops::set_all_expanded(&mut app.project.tasks, expanded);
    app.dirty_tasks = true;
    app.refresh();
    app.move_cursor_to(id);
}
