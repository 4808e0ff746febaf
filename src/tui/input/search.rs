use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

/// Incremental search: the table narrows on every keystroke. Enter keeps
/// the term active, Esc restores whatever was committed before.
pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Cancel: drop the draft, re-derive with the committed term
        (_, KeyCode::Esc) => {
            app.mode = Mode::Navigate;
            app.search_input.clear();
            app.search_cursor = 0;
            app.search_history_index = None;
            app.refresh();
        }

        // Commit the draft
        (_, KeyCode::Enter) => {
            app.search = app.search_input.clone();
            if !app.search.is_empty() {
                let query = app.search.clone();
                // Dedup: drop any previous occurrence, newest first
                app.search_history.retain(|s| s != &query);
                app.search_history.insert(0, query);
                app.search_history.truncate(200);
            }
            app.mode = Mode::Navigate;
            app.search_input.clear();
            app.search_cursor = 0;
            app.search_history_index = None;
            app.refresh();
        }

        // History recall: Up = older
        (_, KeyCode::Up) => {
            if app.search_history.is_empty() {
                return;
            }
            let next = match app.search_history_index {
                None => {
                    app.search_draft = app.search_input.clone();
                    0
                }
                Some(idx) => (idx + 1).min(app.search_history.len() - 1),
            };
            app.search_history_index = Some(next);
            app.search_input = app.search_history[next].clone();
            app.search_cursor = app.search_input.len();
            app.refresh();
        }

        // History recall: Down = newer, past the newest restores the draft
        (_, KeyCode::Down) => {
            match app.search_history_index {
                None => return,
                Some(0) => {
                    app.search_history_index = None;
                    app.search_input = app.search_draft.clone();
                }
                Some(idx) => {
                    app.search_history_index = Some(idx - 1);
                    app.search_input = app.search_history[idx - 1].clone();
                }
            }
            app.search_cursor = app.search_input.len();
            app.refresh();
        }

        // Cursor movement within the draft, grapheme-aware
        (_, KeyCode::Left) => {
            if let Some(prev) = prev_grapheme_boundary(&app.search_input, app.search_cursor) {
                app.search_cursor = prev;
            }
        }
        (_, KeyCode::Right) => {
            if let Some(next) = next_grapheme_boundary(&app.search_input, app.search_cursor) {
                app.search_cursor = next;
            }
        }
        (_, KeyCode::Home) => {
            app.search_cursor = 0;
        }
        (_, KeyCode::End) => {
            app.search_cursor = app.search_input.len();
        }

        // Delete the grapheme before the cursor
        (_, KeyCode::Backspace) => {
            if let Some(prev) = prev_grapheme_boundary(&app.search_input, app.search_cursor) {
                app.search_input.drain(prev..app.search_cursor);
                app.search_cursor = prev;
                leave_history(app);
                app.refresh();
            }
        }

        // Delete the grapheme under the cursor
        (_, KeyCode::Delete) => {
            if let Some(next) = next_grapheme_boundary(&app.search_input, app.search_cursor) {
                app.search_input.drain(app.search_cursor..next);
                leave_history(app);
                app.refresh();
            }
        }

        // Type a character at the cursor
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            app.search_input.insert(app.search_cursor, c);
            app.search_cursor += c.len_utf8();
            leave_history(app);
            app.refresh();
        }

        _ => {}
    }
}

/// Any edit to the draft ends history recall
fn leave_history(app: &mut App) {
    app.search_history_index = None;
    app.search_draft.clear();
}
