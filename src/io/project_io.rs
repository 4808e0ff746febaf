use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::config::DeckConfig;
use crate::model::project::Project;
use crate::model::task::Task;
use crate::model::view::{ViewConfig, default_views};

pub const CONFIG_FILE: &str = "project.toml";
pub const TASKS_FILE: &str = "tasks.json";
pub const VIEWS_FILE: &str = "views.json";

/// Error type for project I/O operations
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("not a taskdeck project: no deck/ directory found")]
    NotAProject,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse project.toml: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("could not parse {path}: {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize: {0}")]
    JsonSerialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Discover the project by walking up from the given directory, looking
/// for a `deck/` subdirectory with a project.toml inside.
pub fn discover_project(start: &Path) -> Result<PathBuf, ProjectError> {
    let mut current = start.to_path_buf();
    loop {
        let deck_dir = current.join("deck");
        if deck_dir.is_dir() && deck_dir.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(ProjectError::NotAProject);
        }
    }
}

/// Load a complete project from the given root directory.
///
/// A missing tasks file is an empty tree; a missing views file gets the
/// built-in defaults. Both are normal for a freshly initialized project.
pub fn load_project(root: &Path) -> Result<Project, ProjectError> {
    let deck_dir = root.join("deck");
    if !deck_dir.is_dir() {
        return Err(ProjectError::NotAProject);
    }

    let config_path = deck_dir.join(CONFIG_FILE);
    let config_text = fs::read_to_string(&config_path).map_err(|e| ProjectError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: DeckConfig = toml::from_str(&config_text)?;

    let tasks = read_json_or(&deck_dir.join(TASKS_FILE), Vec::new)?;
    let views = read_json_or(&deck_dir.join(VIEWS_FILE), default_views)?;

    Ok(Project {
        root: root.to_path_buf(),
        deck_dir,
        config,
        tasks,
        views,
    })
}

fn read_json_or<T, F>(path: &Path, default: F) -> Result<T, ProjectError>
where
    T: serde::de::DeserializeOwned,
    F: FnOnce() -> T,
{
    if !path.exists() {
        return Ok(default());
    }
    let text = fs::read_to_string(path).map_err(|e| ProjectError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| ProjectError::JsonParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Save the task tree back to deck/tasks.json
pub fn save_tasks(deck_dir: &Path, tasks: &[Task]) -> Result<(), ProjectError> {
    let content = serde_json::to_string_pretty(tasks)?;
    atomic_write(&deck_dir.join(TASKS_FILE), content.as_bytes())?;
    Ok(())
}

/// Save the views back to deck/views.json
pub fn save_views(deck_dir: &Path, views: &[ViewConfig]) -> Result<(), ProjectError> {
    let content = serde_json::to_string_pretty(views)?;
    atomic_write(&deck_dir.join(VIEWS_FILE), content.as_bytes())?;
    Ok(())
}
