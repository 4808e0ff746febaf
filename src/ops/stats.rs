use chrono::NaiveDate;

use crate::model::task::{Status, Task};
use crate::pipeline::field::DATE_FORMAT;

/// Per-status task counts over a (sub)tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub new: usize,
    pub planned: usize,
    pub in_progress: usize,
    pub in_review: usize,
    pub completed: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.new + self.planned + self.in_progress + self.in_review + self.completed
    }

    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::New => self.new,
            Status::Planned => self.planned,
            Status::InProgress => self.in_progress,
            Status::InReview => self.in_review,
            Status::Completed => self.completed,
        }
    }

    fn bump(&mut self, status: Status) {
        match status {
            Status::New => self.new += 1,
            Status::Planned => self.planned += 1,
            Status::InProgress => self.in_progress += 1,
            Status::InReview => self.in_review += 1,
            Status::Completed => self.completed += 1,
        }
    }
}

/// Project-level numbers for the status row and `td stats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeckStats {
    pub counts: StatusCounts,
    /// Tasks with a due date before `today` that aren't completed
    pub overdue: usize,
}

impl DeckStats {
    /// Completion as a whole percentage (0 for an empty tree)
    pub fn done_percent(&self) -> usize {
        let total = self.counts.total();
        if total == 0 {
            return 0;
        }
        self.counts.completed * 100 / total
    }
}

/// Tally the whole tree. `today` is passed in rather than read from the
/// clock so callers and tests agree on what counts as overdue.
pub fn compute_stats(tasks: &[Task], today: NaiveDate) -> DeckStats {
    let mut stats = DeckStats::default();
    walk(tasks, today, &mut stats);
    stats
}

fn walk(tasks: &[Task], today: NaiveDate, stats: &mut DeckStats) {
    for task in tasks {
        stats.counts.bump(task.status);
        if task.status != Status::Completed
            && let Some(due) = &task.due_date
            && let Ok(date) = NaiveDate::parse_from_str(due.trim(), DATE_FORMAT)
            && date < today
        {
            stats.overdue += 1;
        }
        walk(&task.children, today, stats);
    }
}
