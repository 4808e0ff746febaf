use std::path::Path;
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use super::project_io::{CONFIG_FILE, TASKS_FILE, VIEWS_FILE};

/// Which deck documents changed on disk since the last poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeckChanges {
    pub config: bool,
    pub tasks: bool,
    pub views: bool,
}

impl DeckChanges {
    pub fn any(self) -> bool {
        self.config || self.tasks || self.views
    }

    fn merge(&mut self, other: DeckChanges) {
        self.config |= other.config;
        self.tasks |= other.tasks;
        self.views |= other.views;
    }
}

/// Sort event paths into the documents they belong to.
///
/// Keyed on the three known file names rather than extensions, so the
/// lock file, the UI state file, and the temp files from atomic saves
/// never trigger a reload.
fn classify<I, P>(paths: I) -> DeckChanges
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut changes = DeckChanges::default();
    for path in paths {
        match path.as_ref().file_name().and_then(|n| n.to_str()) {
            Some(CONFIG_FILE) => changes.config = true,
            Some(TASKS_FILE) => changes.tasks = true,
            Some(VIEWS_FILE) => changes.views = true,
            _ => {}
        }
    }
    changes
}

/// Watches a deck/ directory and reports, per poll, which documents
/// changed. Every deck document lives directly in the directory, so the
/// watch is non-recursive.
pub struct DeckWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<DeckChanges>,
}

impl DeckWatcher {
    /// Start watching the given deck/ directory. `poll()` should be
    /// called from the owning event loop's tick.
    pub fn start(deck_dir: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let Ok(event) = result else { return };
                if !matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                ) {
                    return;
                }
                let changes = classify(&event.paths);
                if changes.any() {
                    let _ = tx.send(changes);
                }
            },
            Config::default(),
        )?;

        watcher.watch(deck_dir, RecursiveMode::NonRecursive)?;
        Ok(DeckWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Coalesce everything queued since the last call. A burst of events
    /// (an atomic save is a create plus a rename) collapses into one
    /// answer; an empty queue reads as no changes.
    pub fn poll(&self) -> DeckChanges {
        let mut changes = DeckChanges::default();
        while let Ok(batch) = self.rx.try_recv() {
            changes.merge(batch);
        }
        changes
    }
}
