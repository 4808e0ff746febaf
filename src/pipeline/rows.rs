use indexmap::IndexMap;

use crate::model::task::{Task, TaskId};

/// Assign 1-based row numbers to every node of the filtered+sorted tree in
/// document order (parent before children, children in their sorted order).
///
/// Every node is numbered regardless of any expansion flag, so a task keeps
/// its row number while subtrees elsewhere collapse and expand. Iteration
/// order of the returned map is document order.
pub fn number_rows(tasks: &[Task]) -> IndexMap<TaskId, usize> {
    fn walk(tasks: &[Task], next: &mut usize, numbers: &mut IndexMap<TaskId, usize>) {
        for task in tasks {
            numbers.insert(task.id, *next);
            *next += 1;
            walk(&task.children, next, numbers);
        }
    }

    let mut numbers = IndexMap::new();
    let mut next = 1;
    walk(tasks, &mut next, &mut numbers);
    numbers
}

/// Collect the ids actually rendered, in document order.
///
/// Every visited node is emitted; children are visited only under an
/// expanded node, so a collapsed parent hides its whole subtree no matter
/// what the descendants' own flags say.
pub fn visible_ids(tasks: &[Task]) -> Vec<TaskId> {
    fn walk(tasks: &[Task], out: &mut Vec<TaskId>) {
        for task in tasks {
            out.push(task.id);
            if task.is_expanded && task.has_children() {
                walk(&task.children, out);
            }
        }
    }

    let mut out = Vec::new();
    walk(tasks, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // root(1) -> child(2) -> grandchild(3), plus sibling root(4)
    fn tree(child_expanded: bool) -> Vec<Task> {
        let mut child = Task::new(2, "Child");
        child.is_expanded = child_expanded;
        child.children.push(Task::new(3, "Grandchild"));
        let mut root = Task::new(1, "Root");
        root.children.push(child);
        vec![root, Task::new(4, "Sibling")]
    }

    #[test]
    fn numbering_is_document_order_from_one() {
        let numbers = number_rows(&tree(true));
        assert_eq!(numbers[&1], 1);
        assert_eq!(numbers[&2], 2);
        assert_eq!(numbers[&3], 3);
        assert_eq!(numbers[&4], 4);
    }

    #[test]
    fn numbering_ignores_expansion_entirely() {
        assert_eq!(number_rows(&tree(true)), number_rows(&tree(false)));
    }

    #[test]
    fn map_iterates_in_document_order() {
        let numbers = number_rows(&tree(false));
        let ids: Vec<u64> = numbers.keys().copied().collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn collapsed_parent_hides_whole_subtree() {
        assert_eq!(visible_ids(&tree(false)), vec![1, 2, 4]);
    }

    #[test]
    fn expanding_reveals_children_in_place() {
        assert_eq!(visible_ids(&tree(true)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn collapsed_ancestor_overrides_descendant_flags() {
        let mut tasks = tree(true);
        tasks[0].is_expanded = false; // root collapsed, child still expanded
        assert_eq!(visible_ids(&tasks), vec![1, 4]);
    }

    #[test]
    fn leaf_expansion_flag_is_irrelevant() {
        let mut leaf = Task::new(1, "Leaf");
        leaf.is_expanded = true;
        assert_eq!(visible_ids(&[leaf]), vec![1]);
    }
}
