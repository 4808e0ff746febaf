use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::model::config::{DeckConfig, ProjectInfo, UiConfig};
use crate::model::project::Project;
use crate::model::task::{Assignee, Priority, Progress, Status, Task};
use crate::model::view::default_views;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An in-memory project that never touches disk.
pub fn minimal_project() -> Project {
    Project {
        root: PathBuf::from("/tmp/test-deck"),
        deck_dir: PathBuf::from("/tmp/test-deck/deck"),
        config: DeckConfig {
            project: ProjectInfo {
                name: "Test".into(),
            },
            ui: UiConfig::default(),
        },
        tasks: Vec::new(),
        views: default_views(),
    }
}

pub fn project_with_tasks(tasks: Vec<Task>) -> Project {
    let mut project = minimal_project();
    project.tasks = tasks;
    project
}

/// Build an App over an in-memory task tree (default views: table + board).
pub fn app_with_tasks(tasks: Vec<Task>) -> App {
    App::new(project_with_tasks(tasks))
}

/// A small fixed tree used across TUI tests:
///
///   1 Website redesign (in_progress, high, due 30/09/2026, AF)
///     2 Draft wireframes (in_progress, 60%)
///     3 Review copy (in_review)
///   4 Data migration (completed)
pub fn sample_tasks() -> Vec<Task> {
    let mut wireframes = Task::new(2, "Draft wireframes");
    wireframes.status = Status::InProgress;
    wireframes.progress = Some(Progress {
        percent: 60,
        history: vec![20],
    });

    let mut copy = Task::new(3, "Review copy");
    copy.status = Status::InReview;

    let mut redesign = Task::new(1, "Website redesign");
    redesign.status = Status::InProgress;
    redesign.priority = Some(Priority::High);
    redesign.due_date = Some("30/09/2026".into());
    redesign.assignees.push(Assignee {
        id: 1,
        name: "Ana Flores".into(),
        initials: "AF".into(),
        color: "#44DDFF".into(),
    });
    redesign.children = vec![wireframes, copy];

    let mut migration = Task::new(4, "Data migration");
    migration.status = Status::Completed;

    vec![redesign, migration]
}

/// A KeyEvent with no modifiers, for driving input handlers in tests
pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}
