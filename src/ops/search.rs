use std::ops::Range;

use regex::Regex;

use crate::model::task::{Task, TaskId};

/// Which field of a task matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Name,
    Assignee,
    Health,
}

impl MatchField {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchField::Name => "name",
            MatchField::Assignee => "assignee",
            MatchField::Health => "health",
        }
    }
}

/// A search hit with the byte spans of every match in the field's text
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub task_id: TaskId,
    pub field: MatchField,
    pub spans: Vec<Range<usize>>,
}

/// Collect all non-overlapping match byte-ranges for a regex in the text.
fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

/// Search the whole tree, recursing through children. Hits come back in
/// document order, one per matching field per task.
pub fn search_tasks(tasks: &[Task], re: &Regex) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    for task in tasks {
        search_task(task, re, &mut hits);
    }
    hits
}

fn search_task(task: &Task, re: &Regex, hits: &mut Vec<SearchHit>) {
    // Name
    let spans = find_matches(re, &task.name);
    if !spans.is_empty() {
        hits.push(SearchHit {
            task_id: task.id,
            field: MatchField::Name,
            spans,
        });
    }

    // Assignee display names
    for assignee in &task.assignees {
        let spans = find_matches(re, &assignee.name);
        if !spans.is_empty() {
            hits.push(SearchHit {
                task_id: task.id,
                field: MatchField::Assignee,
                spans,
            });
        }
    }

    // Health indicator details
    for indicator in &task.health {
        let spans = find_matches(re, &indicator.detail);
        if !spans.is_empty() {
            hits.push(SearchHit {
                task_id: task.id,
                field: MatchField::Health,
                spans,
            });
        }
    }

    for child in &task.children {
        search_task(child, re, hits);
    }
}
