use chrono::NaiveDate;

use crate::model::task::{
    Impact, Priority, Progress, Status, Task, TaskId, find_task_mut, next_task_id,
};
use crate::pipeline::field::DATE_FORMAT;

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task not found: #{0}")]
    NotFound(TaskId),
    #[error("invalid date '{0}': expected dd/mm/yyyy")]
    InvalidDate(String),
    #[error("progress must be 0-100, got {0}")]
    InvalidProgress(u32),
}

// ---------------------------------------------------------------------------
// Field edits
// ---------------------------------------------------------------------------

pub fn rename(tasks: &mut [Task], id: TaskId, name: String) -> Result<(), TaskError> {
    let task = find_task_mut(tasks, id).ok_or(TaskError::NotFound(id))?;
    task.name = name;
    Ok(())
}

/// Set status. Completing a task snapshots its progress at 100, keeping the
/// previous percentage in the history.
pub fn set_status(tasks: &mut [Task], id: TaskId, status: Status) -> Result<(), TaskError> {
    let task = find_task_mut(tasks, id).ok_or(TaskError::NotFound(id))?;
    task.status = status;
    if status == Status::Completed {
        match &mut task.progress {
            Some(progress) if progress.percent < 100 => {
                let previous = progress.percent;
                progress.history.push(previous);
                progress.percent = 100;
            }
            Some(_) => {}
            None => {
                task.progress = Some(Progress {
                    percent: 100,
                    history: Vec::new(),
                });
            }
        }
    }
    Ok(())
}

pub fn set_priority(
    tasks: &mut [Task],
    id: TaskId,
    priority: Option<Priority>,
) -> Result<(), TaskError> {
    let task = find_task_mut(tasks, id).ok_or(TaskError::NotFound(id))?;
    task.priority = priority;
    Ok(())
}

pub fn set_impact(tasks: &mut [Task], id: TaskId, impact: Option<Impact>) -> Result<(), TaskError> {
    let task = find_task_mut(tasks, id).ok_or(TaskError::NotFound(id))?;
    task.impact = impact;
    Ok(())
}

/// Validate the interchange format before storing. The pipeline itself is
/// lenient about stored dates; this is the write-side gate that keeps new
/// data clean.
fn check_date(date: &str) -> Result<(), TaskError> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| TaskError::InvalidDate(date.to_string()))
}

pub fn set_due_date(tasks: &mut [Task], id: TaskId, date: Option<String>) -> Result<(), TaskError> {
    if let Some(d) = &date {
        check_date(d)?;
    }
    let task = find_task_mut(tasks, id).ok_or(TaskError::NotFound(id))?;
    task.due_date = date;
    Ok(())
}

pub fn set_start_date(
    tasks: &mut [Task],
    id: TaskId,
    date: Option<String>,
) -> Result<(), TaskError> {
    if let Some(d) = &date {
        check_date(d)?;
    }
    let task = find_task_mut(tasks, id).ok_or(TaskError::NotFound(id))?;
    task.start_date = date;
    Ok(())
}

/// Set progress percentage, appending the old value to the history
pub fn set_progress(tasks: &mut [Task], id: TaskId, percent: u32) -> Result<(), TaskError> {
    if percent > 100 {
        return Err(TaskError::InvalidProgress(percent));
    }
    let task = find_task_mut(tasks, id).ok_or(TaskError::NotFound(id))?;
    match &mut task.progress {
        Some(progress) => {
            let previous = progress.percent;
            progress.history.push(previous);
            progress.percent = percent as u8;
        }
        None => {
            task.progress = Some(Progress {
                percent: percent as u8,
                history: Vec::new(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Expansion
// ---------------------------------------------------------------------------

pub fn toggle_expanded(tasks: &mut [Task], id: TaskId) -> Result<bool, TaskError> {
    let task = find_task_mut(tasks, id).ok_or(TaskError::NotFound(id))?;
    task.is_expanded = !task.is_expanded;
    Ok(task.is_expanded)
}

pub fn set_all_expanded(tasks: &mut [Task], expanded: bool) {
    for task in tasks {
        task.is_expanded = expanded;
        set_all_expanded(&mut task.children, expanded);
    }
}

// ---------------------------------------------------------------------------
// Structure edits
// ---------------------------------------------------------------------------

/// Append a new top-level task. Returns the assigned id.
pub fn add_task(tasks: &mut Vec<Task>, name: String) -> TaskId {
    let id = next_task_id(tasks);
    tasks.push(Task::new(id, name));
    id
}

/// Append a subtask under `parent_id`. Returns the assigned id.
pub fn add_subtask(tasks: &mut Vec<Task>, parent_id: TaskId, name: String) -> Result<TaskId, TaskError> {
    let id = next_task_id(tasks);
    let parent = find_task_mut(tasks, parent_id).ok_or(TaskError::NotFound(parent_id))?;
    parent.children.push(Task::new(id, name));
    parent.is_expanded = true;
    Ok(id)
}

/// Remove a task (and its whole subtree) from wherever it sits.
pub fn remove_task(tasks: &mut Vec<Task>, id: TaskId) -> Result<Task, TaskError> {
    if let Some(pos) = tasks.iter().position(|t| t.id == id) {
        return Ok(tasks.remove(pos));
    }
    for task in tasks.iter_mut() {
        if let Ok(removed) = remove_task(&mut task.children, id) {
            return Ok(removed);
        }
    }
    Err(TaskError::NotFound(id))
}

/// Swap a task with its previous sibling. No-op at the top of its group.
pub fn move_up(tasks: &mut Vec<Task>, id: TaskId) -> Result<(), TaskError> {
    reorder(tasks, id, -1)
}

/// Swap a task with its next sibling. No-op at the bottom of its group.
pub fn move_down(tasks: &mut Vec<Task>, id: TaskId) -> Result<(), TaskError> {
    reorder(tasks, id, 1)
}

fn reorder(tasks: &mut Vec<Task>, id: TaskId, delta: isize) -> Result<(), TaskError> {
    if let Some(pos) = tasks.iter().position(|t| t.id == id) {
        let target = pos as isize + delta;
        if target >= 0 && (target as usize) < tasks.len() {
            tasks.swap(pos, target as usize);
        }
        return Ok(());
    }
    for task in tasks.iter_mut() {
        if reorder(&mut task.children, id, delta).is_ok() {
            return Ok(());
        }
    }
    Err(TaskError::NotFound(id))
}
