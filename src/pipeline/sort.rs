use std::cmp::Ordering;

use crate::model::task::Task;
use crate::model::view::{SortDirection, SortSpec};

use super::field::{self, Column};

/// Reorder every sibling group by the view's single sort rule.
///
/// Each level is sorted independently — children never leave their parent.
/// With no rule this is the identity. The sort is stable, and the returned
/// tree is freshly built; the input is never mutated.
pub fn sort_tree(tasks: &[Task], sort: Option<&SortSpec>) -> Vec<Task> {
    let Some(spec) = sort else {
        return tasks.to_vec();
    };
    let column = Column::parse(&spec.column);
    sort_level(tasks, column, spec.direction)
}

fn sort_level(tasks: &[Task], column: Option<Column>, direction: SortDirection) -> Vec<Task> {
    let mut siblings: Vec<Task> = tasks
        .iter()
        .map(|task| {
            let mut task = task.clone();
            task.children = sort_level(&task.children, column, direction);
            task
        })
        .collect();
    // Vec::sort_by is stable: equal keys keep their input order
    siblings.sort_by(|a, b| compare_tasks(a, b, column, direction));
    siblings
}

/// Comparator for two siblings on the active column.
///
/// Missing values always sink to the end of the list — emptiness is not
/// direction-sensitive, so a task with no due date lands last whether the
/// view sorts ascending or descending. Only present-present comparisons
/// honor the direction.
fn compare_tasks(
    a: &Task,
    b: &Task,
    column: Option<Column>,
    direction: SortDirection,
) -> Ordering {
    match (field::value_of(a, column), field::value_of(b, column)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => match direction {
            SortDirection::Asc => x.compare(&y),
            SortDirection::Desc => x.compare(&y).reverse(),
        },
    }
}
