use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Persisted TUI state (written to .state.json)
///
/// Expansion state is not kept here: it lives on the tasks themselves and
/// travels with tasks.json.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiState {
    /// Id of the view that was showing
    pub active_view: String,
    /// Last executed search pattern
    #[serde(default)]
    pub last_search: Option<String>,
    /// Search history (most recent first, max 200)
    #[serde(default)]
    pub search_history: Vec<String>,
    /// Per-view cursor/scroll, keyed by view id
    #[serde(default)]
    pub views: HashMap<String, ViewUiState>,
}

/// Per-view UI state
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ViewUiState {
    /// Cursor index into the flat visible rows
    #[serde(default)]
    pub cursor: usize,
    /// Scroll offset (first visible row)
    #[serde(default)]
    pub scroll_offset: usize,
}

/// Read .state.json from the deck directory
pub fn read_ui_state(deck_dir: &Path) -> Option<UiState> {
    let path = deck_dir.join(".state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .state.json to the deck directory
pub fn write_ui_state(deck_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = deck_dir.join(".state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}
