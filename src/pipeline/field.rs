use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;

use crate::model::task::{Impact, Priority, Status, Task};

/// Interchange format for start/due dates (day/month/year)
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// A task column that filter and sort rules can reference.
///
/// Rules carry the column as a string; `Column::parse` is the single place
/// that string is resolved. An unrecognized id resolves to no column, which
/// downstream reads as a missing field — a misconfigured rule degrades
/// instead of erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Status,
    Priority,
    Impact,
    Assignees,
    StartDate,
    DueDate,
    Progress,
}

impl Column {
    /// Resolve a column id. Accepts the canonical snake_case ids plus the
    /// camelCase spellings older saved views used.
    pub fn parse(s: &str) -> Option<Column> {
        match s {
            "name" => Some(Column::Name),
            "status" => Some(Column::Status),
            "priority" => Some(Column::Priority),
            "impact" => Some(Column::Impact),
            "assignees" => Some(Column::Assignees),
            "start_date" | "startDate" => Some(Column::StartDate),
            "due_date" | "dueDate" => Some(Column::DueDate),
            "progress" => Some(Column::Progress),
            _ => None,
        }
    }
}

/// A typed field value read from a task by column id.
///
/// One column always yields one variant, so ordering only ever compares
/// like with like; the cross-variant arm falls back to string ordering for
/// safety rather than panicking.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Status(Status),
    Priority(Priority),
    Impact(Impact),
    Date(NaiveDate),
    Percent(u8),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Status(s) => write!(f, "{}", s.as_str()),
            FieldValue::Priority(p) => write!(f, "{}", p.as_str()),
            FieldValue::Impact(i) => write!(f, "{}", i.as_str()),
            FieldValue::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            FieldValue::Percent(p) => write!(f, "{}", p),
        }
    }
}

impl FieldValue {
    /// Total order for the sorter. Enums compare by their documented rank
    /// (workflow order for status, severity order for priority/impact),
    /// dates chronologically, text lexically.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Status(a), FieldValue::Status(b)) => a.cmp(b),
            (FieldValue::Priority(a), FieldValue::Priority(b)) => a.cmp(b),
            (FieldValue::Impact(a), FieldValue::Impact(b)) => a.cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::Percent(a), FieldValue::Percent(b)) => a.cmp(b),
            (a, b) => a.to_string().cmp(&b.to_string()),
        }
    }
}

/// Parse an interchange date, treating anything malformed as absent
fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Read one column from a task.
///
/// `None` means the field is missing: unset option fields, empty assignee
/// lists, unparseable dates, and unresolvable columns all land here and get
/// the same emptiness treatment from the evaluator and sorter.
pub fn value_of(task: &Task, column: Option<Column>) -> Option<FieldValue> {
    match column? {
        Column::Name => Some(FieldValue::Text(task.name.clone())),
        Column::Status => Some(FieldValue::Status(task.status)),
        Column::Priority => task.priority.map(FieldValue::Priority),
        Column::Impact => task.impact.map(FieldValue::Impact),
        Column::Assignees => {
            if task.assignees.is_empty() {
                None
            } else {
                let names: Vec<&str> = task.assignees.iter().map(|a| a.name.as_str()).collect();
                Some(FieldValue::Text(names.join(", ")))
            }
        }
        Column::StartDate => task
            .start_date
            .as_deref()
            .and_then(parse_date)
            .map(FieldValue::Date),
        Column::DueDate => task
            .due_date
            .as_deref()
            .and_then(parse_date)
            .map(FieldValue::Date),
        Column::Progress => task.progress.as_ref().map(|p| FieldValue::Percent(p.percent)),
    }
}
