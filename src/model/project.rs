use std::path::PathBuf;

use super::config::DeckConfig;
use super::task::Task;
use super::view::ViewConfig;

/// A loaded project: the shared task tree plus every saved view.
///
/// This is the single mutable snapshot the application owns. The derivation
/// pipeline reads it and returns fresh data; all mutation goes through
/// `ops::*`, after which views must re-derive.
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory containing deck/
    pub root: PathBuf,
    /// The deck/ directory itself
    pub deck_dir: PathBuf,
    pub config: DeckConfig,
    /// Root sequence of the task tree
    pub tasks: Vec<Task>,
    /// Saved views in display order
    pub views: Vec<ViewConfig>,
}

impl Project {
    pub fn view(&self, id: &str) -> Option<&ViewConfig> {
        self.views.iter().find(|v| v.id == id)
    }

    pub fn view_mut(&mut self, id: &str) -> Option<&mut ViewConfig> {
        self.views.iter_mut().find(|v| v.id == id)
    }

    /// The view to open when none is named: configured default, else first
    pub fn default_view(&self) -> Option<&ViewConfig> {
        if let Some(id) = &self.config.ui.default_view
            && let Some(view) = self.view(id)
        {
            return Some(view);
        }
        self.views.first()
    }
}
