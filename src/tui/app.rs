use std::collections::HashMap;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;

use crate::io::lock::DeckLock;
use crate::io::project_io::{self, discover_project, load_project};
use crate::io::state::{UiState, ViewUiState, read_ui_state, write_ui_state};
use crate::io::watcher::DeckWatcher;
use crate::model::project::Project;
use crate::model::task::{Task, TaskId};
use crate::model::view::{ViewConfig, default_views};
use crate::pipeline::{self, DerivedView};

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Search,
}

/// Main application state.
///
/// The app owns the mutable project snapshot; `derived` is the pipeline
/// output for the active view and is recomputed after every change to the
/// tree, the view configuration, or the search term. Rendering only ever
/// reads `derived` — no view reimplements filter or sort logic.
pub struct App {
    pub project: Project,
    /// Index of the active view in project.views
    pub view_idx: usize,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// Pipeline output for the active view and search term
    pub derived: DerivedView,
    /// Per-view cursor/scroll, keyed by view id
    pub view_states: HashMap<String, ViewUiState>,
    /// Committed search term (feeds the pipeline while navigating)
    pub search: String,
    /// Draft typed in Search mode (feeds the pipeline incrementally)
    pub search_input: String,
    /// Byte offset of the cursor in search_input
    pub search_cursor: usize,
    pub search_history: Vec<String>,
    /// Index into search_history while recalling with Up/Down
    pub search_history_index: Option<usize>,
    /// Draft saved while recalling history
    pub search_draft: String,
    /// 's' pressed, waiting for the column key
    pub sort_pending: bool,
    pub show_help: bool,
    pub help_scroll: usize,
    /// Expansion flags changed; tasks.json must be written on exit
    pub dirty_tasks: bool,
    /// Sort rules changed; views.json must be written on exit
    pub dirty_views: bool,
    /// Transient one-line message for the status row
    pub status_message: Option<String>,
}

impl App {
    pub fn new(mut project: Project) -> Self {
        if project.views.is_empty() {
            project.views = default_views();
        }
        let theme = Theme::from_config(&project.config.ui);
        let view_idx = project
            .default_view()
            .and_then(|dv| project.views.iter().position(|v| v.id == dv.id))
            .unwrap_or(0);
        let derived = pipeline::derive_view(&project.tasks, &project.views[view_idx], "");

        App {
            project,
            view_idx,
            mode: Mode::Navigate,
            should_quit: false,
            theme,
            derived,
            view_states: HashMap::new(),
            search: String::new(),
            search_input: String::new(),
            search_cursor: 0,
            search_history: Vec::new(),
            search_history_index: None,
            search_draft: String::new(),
            sort_pending: false,
            show_help: false,
            help_scroll: 0,
            dirty_tasks: false,
            dirty_views: false,
            status_message: None,
        }
    }

    pub fn active_view(&self) -> &ViewConfig {
        &self.project.views[self.view_idx]
    }

    pub fn active_view_id(&self) -> &str {
        &self.project.views[self.view_idx].id
    }

    /// The search term the pipeline sees right now: the draft while typing,
    /// the committed term otherwise.
    pub fn active_search(&self) -> &str {
        match self.mode {
            Mode::Search => &self.search_input,
            Mode::Navigate => &self.search,
        }
    }

    /// Case-insensitive regex for highlighting the active search term
    pub fn active_search_re(&self) -> Option<Regex> {
        let term = self.active_search();
        if term.is_empty() {
            return None;
        }
        Regex::new(&format!("(?i){}", regex::escape(term))).ok()
    }

    /// Re-run the pipeline for the active view and clamp the cursor to the
    /// new visible set.
    pub fn refresh(&mut self) {
        let search = self.active_search().to_string();
        self.derived = pipeline::derive_view(
            &self.project.tasks,
            &self.project.views[self.view_idx],
            &search,
        );
        let max = self.derived.visible_len().saturating_sub(1);
        let state = self.view_state_mut();
        state.cursor = state.cursor.min(max);
    }

    pub fn view_state_mut(&mut self) -> &mut ViewUiState {
        let id = self.project.views[self.view_idx].id.clone();
        self.view_states.entry(id).or_default()
    }

    pub fn cursor(&self) -> usize {
        self.view_states
            .get(self.active_view_id())
            .map_or(0, |s| s.cursor)
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        let max = self.derived.visible_len().saturating_sub(1);
        self.view_state_mut().cursor = cursor.min(max);
    }

    /// Id of the task under the cursor, if any rows are visible
    pub fn cursor_task_id(&self) -> Option<TaskId> {
        self.derived.visible_ids.get(self.cursor()).copied()
    }

    /// Move the cursor onto a task id, if it is currently visible
    pub fn move_cursor_to(&mut self, id: TaskId) {
        if let Some(pos) = self.derived.visible_ids.iter().position(|&v| v == id) {
            self.view_state_mut().cursor = pos;
        }
    }

    /// Switch the active view by offset (wrapping), keeping per-view state
    pub fn cycle_view(&mut self, delta: isize) {
        let len = self.project.views.len() as isize;
        self.view_idx = ((self.view_idx as isize + delta).rem_euclid(len)) as usize;
        self.refresh();
    }

    pub fn select_view(&mut self, idx: usize) {
        if idx < self.project.views.len() {
            self.view_idx = idx;
            self.refresh();
        }
    }
}

/// Parent of a task in the derived tree, if it has one
pub fn parent_of(tasks: &[Task], id: TaskId) -> Option<TaskId> {
    for task in tasks {
        if task.children.iter().any(|c| c.id == id) {
            return Some(task.id);
        }
        if let Some(found) = parent_of(&task.children, id) {
            return Some(found);
        }
    }
    None
}

/// Restore UI state from .state.json.
///
/// The last search is restored into the history, not activated — launching
/// into a silently filtered table is worse than retyping `/` + Up.
pub fn restore_ui_state(app: &mut App) {
    let ui_state = match read_ui_state(&app.project.deck_dir) {
        Some(s) => s,
        None => return,
    };

    if let Some(idx) = app
        .project
        .views
        .iter()
        .position(|v| v.id == ui_state.active_view)
    {
        app.view_idx = idx;
    }

    app.search_history = ui_state.search_history;
    if let Some(last) = ui_state.last_search
        && !app.search_history.contains(&last)
    {
        app.search_history.insert(0, last);
    }

    for (view_id, vs) in ui_state.views {
        app.view_states.insert(view_id, vs);
    }
}

/// Save UI state to .state.json
pub fn save_ui_state(app: &App) {
    let ui_state = UiState {
        active_view: app.active_view_id().to_string(),
        last_search: app.search_history.first().cloned(),
        search_history: app.search_history.clone(),
        views: app.view_states.clone(),
    };
    let _ = write_ui_state(&app.project.deck_dir, &ui_state);
}

/// Write back expansion/sort changes made in the TUI, under the lock
fn persist_changes(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    let _lock = DeckLock::acquire_default(&app.project.deck_dir)?;
    if app.dirty_tasks {
        project_io::save_tasks(&app.project.deck_dir, &app.project.tasks)?;
    }
    if app.dirty_views {
        project_io::save_views(&app.project.deck_dir, &app.project.views)?;
    }
    Ok(())
}

/// Reload the project after an external edit. A mid-write file fails to
/// parse; the next watcher event retries. External edits win over pending
/// in-memory expansion/sort changes.
fn reload_project(app: &mut App) {
    if let Ok(project) = load_project(&app.project.root) {
        app.project = project;
        if app.project.views.is_empty() {
            app.project.views = default_views();
        }
        app.dirty_tasks = false;
        app.dirty_views = false;
        app.theme = Theme::from_config(&app.project.config.ui);
        app.view_idx = app.view_idx.min(app.project.views.len() - 1);
        app.refresh();
    }
}

/// Run the TUI application
pub fn run(project_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let start = match project_dir {
        Some(dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        None => std::env::current_dir()?,
    };
    let root = discover_project(&start)?;
    let project = load_project(&root)?;

    let mut app = App::new(project);
    restore_ui_state(&mut app);
    app.refresh();

    // Watch deck/ so external `td` invocations and hand edits show up live
    let watcher = DeckWatcher::start(&app.project.deck_dir).ok();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    save_ui_state(&app);
    if app.dirty_tasks || app.dirty_views {
        persist_changes(&app)?;
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&DeckWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if let Some(watcher) = watcher
            && watcher.poll().any()
        {
            reload_project(app);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
