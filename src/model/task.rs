use serde::{Deserialize, Serialize};

/// Globally unique task identifier. Unique across the whole tree, not just
/// siblings — row numbering and selection key by id, never by path.
pub type TaskId = u64;

/// Workflow status. The derive order is the workflow order and is the total
/// order used when sorting on the status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    New,
    Planned,
    InProgress,
    InReview,
    Completed,
}

impl Status {
    /// Canonical string form (matches the serde encoding)
    pub fn as_str(self) -> &'static str {
        match self {
            Status::New => "new",
            Status::Planned => "planned",
            Status::InProgress => "in_progress",
            Status::InReview => "in_review",
            Status::Completed => "completed",
        }
    }

    /// Human label for table cells and board column headers
    pub fn label(self) -> &'static str {
        match self {
            Status::New => "New",
            Status::Planned => "Planned",
            Status::InProgress => "In Progress",
            Status::InReview => "In Review",
            Status::Completed => "Completed",
        }
    }

    /// All statuses in workflow order (board columns render in this order)
    pub fn all() -> [Status; 5] {
        [
            Status::New,
            Status::Planned,
            Status::InProgress,
            Status::InReview,
            Status::Completed,
        ]
    }

    pub fn parse(s: &str) -> Option<Status> {
        match s {
            "new" => Some(Status::New),
            "planned" => Some(Status::Planned),
            "in_progress" => Some(Status::InProgress),
            "in_review" => Some(Status::InReview),
            "completed" => Some(Status::Completed),
            _ => None,
        }
    }
}

/// Priority in severity order: Urgent ranks first when sorting ascending.
/// An explicit `None` is a real value and ranks last among present values;
/// a task with no priority at all reads as missing instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
    None,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::None => "none",
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        match s {
            "urgent" => Some(Priority::Urgent),
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            "none" => Some(Priority::None),
            _ => None,
        }
    }
}

/// Impact in severity order: High ranks first when sorting ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    pub fn as_str(self) -> &'static str {
        match self {
            Impact::High => "high",
            Impact::Medium => "medium",
            Impact::Low => "low",
        }
    }
}

/// A person assigned to a task. The sequence order on a task is display
/// order only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: u64,
    pub name: String,
    pub initials: String,
    /// Hex color tag like "#44DDFF"
    pub color: String,
}

/// Completion tracking: current percentage plus past values in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// 0–100
    pub percent: u8,
    #[serde(default)]
    pub history: Vec<u8>,
}

/// Status of one health sub-indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Complete,
    AtRisk,
    Blocked,
}

/// A named health sub-indicator with free-text detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthIndicator {
    pub label: String,
    pub status: HealthStatus,
    #[serde(default)]
    pub detail: String,
}

/// Per-row visual override. Presentation-only: the derivation pipeline
/// never reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A node in the task tree.
///
/// Dates are stored in their interchange form (`dd/mm/yyyy` strings) and
/// parsed leniently where a typed date is needed; a malformed date reads
/// as missing rather than failing the load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<Impact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<Assignee>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub health: Vec<HealthIndicator>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Task>,
    /// Whether children are included in the visible set. UI-only: has no
    /// effect on filtering, sorting, or row numbering.
    #[serde(default = "default_expanded")]
    pub is_expanded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<RowStyle>,
}

fn default_expanded() -> bool {
    true
}

impl Task {
    /// Create a task with the given id and name; everything else empty
    pub fn new(id: TaskId, name: impl Into<String>) -> Self {
        Task {
            id,
            name: name.into(),
            status: Status::New,
            priority: None,
            impact: None,
            assignees: Vec::new(),
            start_date: None,
            due_date: None,
            progress: None,
            health: Vec::new(),
            children: Vec::new(),
            is_expanded: true,
            style: None,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Find a task anywhere in the tree by id (depth-first)
pub fn find_task(tasks: &[Task], id: TaskId) -> Option<&Task> {
    for task in tasks {
        if task.id == id {
            return Some(task);
        }
        if let Some(found) = find_task(&task.children, id) {
            return Some(found);
        }
    }
    None
}

/// Mutable lookup by id (depth-first)
pub fn find_task_mut(tasks: &mut [Task], id: TaskId) -> Option<&mut Task> {
    for task in tasks {
        if task.id == id {
            return Some(task);
        }
        if let Some(found) = find_task_mut(&mut task.children, id) {
            return Some(found);
        }
    }
    None
}

/// Total number of tasks in the tree, including every descendant
pub fn count_tasks(tasks: &[Task]) -> usize {
    tasks.iter().map(|t| 1 + count_tasks(&t.children)).sum()
}

/// The next free id: one past the largest id anywhere in the tree
pub fn next_task_id(tasks: &[Task]) -> TaskId {
    fn max_id(tasks: &[Task]) -> TaskId {
        tasks
            .iter()
            .map(|t| t.id.max(max_id(&t.children)))
            .max()
            .unwrap_or(0)
    }
    max_id(tasks) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Vec<Task> {
        let mut parent = Task::new(1, "Parent");
        let mut child = Task::new(2, "Child");
        child.children.push(Task::new(5, "Grandchild"));
        parent.children.push(child);
        vec![parent, Task::new(3, "Sibling")]
    }

    #[test]
    fn find_reaches_nested_tasks() {
        let tree = sample_tree();
        assert_eq!(find_task(&tree, 5).unwrap().name, "Grandchild");
        assert_eq!(find_task(&tree, 3).unwrap().name, "Sibling");
        assert!(find_task(&tree, 99).is_none());
    }

    #[test]
    fn find_mut_edits_in_place() {
        let mut tree = sample_tree();
        find_task_mut(&mut tree, 2).unwrap().name = "Renamed".into();
        assert_eq!(find_task(&tree, 2).unwrap().name, "Renamed");
    }

    #[test]
    fn count_includes_descendants() {
        assert_eq!(count_tasks(&sample_tree()), 4);
        assert_eq!(count_tasks(&[]), 0);
    }

    #[test]
    fn next_id_is_one_past_max_anywhere() {
        assert_eq!(next_task_id(&sample_tree()), 6);
        assert_eq!(next_task_id(&[]), 1);
    }

    #[test]
    fn status_roundtrips_through_string_form() {
        for status in Status::all() {
            assert_eq!(Status::parse(status.as_str()), Some(status));
        }
        assert!(Status::parse("bogus").is_none());
    }

    #[test]
    fn enum_orders_are_the_documented_ranks() {
        assert!(Status::New < Status::Completed);
        assert!(Priority::Urgent < Priority::Low);
        assert!(Priority::Low < Priority::None);
        assert!(Impact::High < Impact::Low);
    }

    #[test]
    fn serde_defaults_fill_optional_fields() {
        let task: Task =
            serde_json::from_str(r#"{"id": 7, "name": "Minimal", "status": "new"}"#).unwrap();
        assert_eq!(task.id, 7);
        assert!(task.is_expanded);
        assert!(task.children.is_empty());
        assert!(task.priority.is_none());
        assert!(task.assignees.is_empty());
    }

    #[test]
    fn task_serde_round_trip() {
        let mut task = Task::new(1, "Ship it");
        task.status = Status::InProgress;
        task.priority = Some(Priority::High);
        task.due_date = Some("28/02/2026".into());
        task.assignees.push(Assignee {
            id: 10,
            name: "Dana Reyes".into(),
            initials: "DR".into(),
            color: "#44DDFF".into(),
        });
        task.progress = Some(Progress {
            percent: 40,
            history: vec![10, 25],
        });
        task.is_expanded = false;

        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }
}
