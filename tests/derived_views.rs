//! Pipeline scenarios over the public API: the derivation guarantees every
//! view relies on, exercised end to end through `pipeline::derive_view`.

use taskdeck::model::task::{Priority, Status, Task, find_task_mut};
use taskdeck::model::view::{
    FilterOperator, FilterRule, SortDirection, SortSpec, ViewConfig, ViewKind,
};
use taskdeck::pipeline::derive_view;

fn table_view() -> ViewConfig {
    ViewConfig::new("t", "Test", ViewKind::Table)
}

fn rule(column: &str, operator: FilterOperator, value: &str) -> FilterRule {
    FilterRule::new(column, operator, value)
}

/// The canonical scenario: a completed parent kept alive by a matching
/// child, numbered across the whole derived set, with collapse touching
/// only visibility.
#[test]
fn completed_parent_survives_for_its_matching_child() {
    let mut alpha = Task::new(1, "Alpha");
    alpha.status = Status::New;
    let mut beta = Task::new(2, "Beta");
    beta.status = Status::Completed;
    let mut beta_child = Task::new(3, "Beta child");
    beta_child.status = Status::New;
    beta.children.push(beta_child);
    let mut tasks = vec![alpha, beta];

    let mut view = table_view();
    view.filters.push(rule("status", FilterOperator::Is, "new"));

    let derived = derive_view(&tasks, &view, "");
    let top_ids: Vec<u64> = derived.tasks.iter().map(|t| t.id).collect();
    assert_eq!(top_ids, vec![1, 2]);
    assert_eq!(derived.tasks[1].children[0].id, 3);
    assert_eq!(derived.row_numbers[&1], 1);
    assert_eq!(derived.row_numbers[&2], 2);
    assert_eq!(derived.row_numbers[&3], 3);
    assert_eq!(derived.visible_ids, vec![1, 2, 3]);

    find_task_mut(&mut tasks, 2).unwrap().is_expanded = false;
    let collapsed = derive_view(&tasks, &view, "");
    assert_eq!(collapsed.visible_ids, vec![1, 2]);
    assert_eq!(collapsed.row_numbers, derived.row_numbers);
}

#[test]
fn deep_ancestor_chain_survives_a_leaf_match() {
    let mut leaf = Task::new(4, "deep target");
    leaf.status = Status::New;
    let mut mid = Task::new(3, "Middle");
    mid.status = Status::Completed;
    mid.children.push(leaf);
    let mut top = Task::new(2, "Top");
    top.status = Status::Completed;
    top.children.push(mid);
    let mut root = Task::new(1, "Root");
    root.status = Status::Completed;
    root.children.push(top);

    let derived = derive_view(&[root], &table_view(), "target");
    assert_eq!(derived.visible_ids, vec![1, 2, 3, 4]);
    // Only the chain to the match survives, nothing else was invented
    assert_eq!(derived.total_len(), 4);
}

#[test]
fn re_expanding_inserts_children_in_place() {
    let mut child = Task::new(2, "Child");
    child.is_expanded = false;
    child.children.push(Task::new(3, "Grandchild"));
    let mut root = Task::new(1, "Root");
    root.children.push(child);
    let mut tasks = vec![root, Task::new(4, "Sibling")];

    let view = table_view();
    assert_eq!(derive_view(&tasks, &view, "").visible_ids, vec![1, 2, 4]);

    find_task_mut(&mut tasks, 2).unwrap().is_expanded = true;
    // The grandchild appears immediately after its parent
    assert_eq!(derive_view(&tasks, &view, "").visible_ids, vec![1, 2, 3, 4]);
}

#[test]
fn filter_and_sort_compose() {
    let mut a = Task::new(1, "A");
    a.status = Status::New;
    a.priority = Some(Priority::Low);
    let mut b = Task::new(2, "B");
    b.status = Status::Completed;
    b.priority = Some(Priority::Urgent);
    let mut c = Task::new(3, "C");
    c.status = Status::New;
    c.priority = Some(Priority::Urgent);
    let mut d = Task::new(4, "D");
    d.status = Status::New;

    let mut view = table_view();
    view.filters.push(rule("status", FilterOperator::Is, "new"));
    view.sort = Some(SortSpec {
        column: "priority".into(),
        direction: SortDirection::Asc,
    });

    let derived = derive_view(&[a, b, c, d], &view, "");
    let ids: Vec<u64> = derived.tasks.iter().map(|t| t.id).collect();
    // Completed B is gone; urgent C leads; priority-less D sinks last
    assert_eq!(ids, vec![3, 1, 4]);
    // Row numbers follow the sorted order
    assert_eq!(derived.row_numbers[&3], 1);
    assert_eq!(derived.row_numbers[&4], 3);
}

#[test]
fn missing_values_sink_regardless_of_direction() {
    let mut dated = Task::new(1, "Dated");
    dated.due_date = Some("01/06/2026".into());
    let undated = Task::new(2, "Undated");

    for direction in [SortDirection::Asc, SortDirection::Desc] {
        let mut view = table_view();
        view.sort = Some(SortSpec {
            column: "due_date".into(),
            direction,
        });
        let derived = derive_view(&[undated.clone(), dated.clone()], &view, "");
        let ids: Vec<u64> = derived.tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2], "direction {:?}", direction);
    }
}

#[test]
fn derivation_is_idempotent_and_pure() {
    let mut root = Task::new(1, "Root");
    root.children.push(Task::new(2, "Child node"));
    root.children.push(Task::new(3, "Other child"));
    let tasks = vec![root];
    let snapshot = tasks.clone();

    let mut view = table_view();
    view.filters
        .push(rule("name", FilterOperator::Contains, "child"));
    view.sort = Some(SortSpec {
        column: "name".into(),
        direction: SortDirection::Asc,
    });

    let first = derive_view(&tasks, &view, "");
    let second = derive_view(&tasks, &view, "");
    assert_eq!(first, second);
    assert_eq!(tasks, snapshot);

    // Deriving from the already-derived tree changes nothing further
    let again = derive_view(&first.tasks, &view, "");
    assert_eq!(again.tasks, first.tasks);
}

#[test]
fn unknown_columns_and_operators_degrade_gracefully() {
    let mut a = Task::new(1, "A");
    a.status = Status::New;
    let b = Task::new(2, "B");

    // Unknown sort column: order untouched
    let mut view = table_view();
    view.sort = Some(SortSpec {
        column: "estimate".into(),
        direction: SortDirection::Asc,
    });
    let derived = derive_view(&[a.clone(), b.clone()], &view, "");
    let ids: Vec<u64> = derived.tasks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2]);

    // Unknown filter column satisfies only is_empty
    let mut view = table_view();
    view.filters.push(rule("estimate", FilterOperator::IsEmpty, ""));
    assert_eq!(derive_view(&[a.clone(), b.clone()], &view, "").total_len(), 2);

    let mut view = table_view();
    view.filters.push(rule("estimate", FilterOperator::Is, "5"));
    assert_eq!(derive_view(&[a.clone(), b.clone()], &view, "").total_len(), 0);

    // Unrecognized operator is fail-open
    let mut view = table_view();
    view.filters
        .push(rule("name", FilterOperator::Unknown, "zzz"));
    assert_eq!(derive_view(&[a, b], &view, "").total_len(), 2);
}

#[test]
fn search_and_filters_are_both_required() {
    let mut a = Task::new(1, "Launch checklist");
    a.status = Status::New;
    let mut b = Task::new(2, "Launch retro");
    b.status = Status::Completed;

    let mut view = table_view();
    view.filters.push(rule("status", FilterOperator::Is, "new"));

    let derived = derive_view(&[a, b], &view, "launch");
    assert_eq!(derived.visible_ids, vec![1]);
}
