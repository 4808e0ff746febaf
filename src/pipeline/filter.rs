use crate::model::task::Task;
use crate::model::view::{FilterOperator, FilterRule};

use super::field::{self, Column};

/// Case-insensitive substring test of the search term against the task
/// name. An empty term matches everything.
pub fn matches_search(task: &Task, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    task.name.to_lowercase().contains(&search.to_lowercase())
}

/// Evaluate one filter rule against one task.
///
/// A missing field (unset, empty list, malformed date, unknown column)
/// satisfies only `is_empty`. An operator this build doesn't recognize
/// matches unconditionally so a misconfigured rule never hides tasks.
pub fn matches_rule(task: &Task, rule: &FilterRule) -> bool {
    let field = field::value_of(task, Column::parse(&rule.column));

    let Some(value) = field else {
        return rule.operator == FilterOperator::IsEmpty;
    };

    let text = value.to_string();
    let needle = rule.value.as_str().to_lowercase();

    match rule.operator {
        FilterOperator::Contains => text.to_lowercase().contains(&needle),
        FilterOperator::NotContains => !text.to_lowercase().contains(&needle),
        FilterOperator::Is => text.to_lowercase() == needle,
        FilterOperator::IsNot => text.to_lowercase() != needle,
        FilterOperator::IsEmpty => text.trim().is_empty(),
        FilterOperator::IsNotEmpty => !text.trim().is_empty(),
        FilterOperator::IsAnyOf => rule
            .value
            .as_list()
            .iter()
            .any(|v| v.to_lowercase() == text.to_lowercase()),
        FilterOperator::IsNoneOf => !rule
            .value
            .as_list()
            .iter()
            .any(|v| v.to_lowercase() == text.to_lowercase()),
        FilterOperator::Unknown => true,
    }
}

/// A node's direct match: search term AND every filter rule. Empty search
/// and an empty rule set both match.
pub fn matches_directly(task: &Task, search: &str, filters: &[FilterRule]) -> bool {
    matches_search(task, search) && filters.iter().all(|rule| matches_rule(task, rule))
}

/// Prune the tree, keeping a node if it matches directly or any descendant
/// survives — a matching leaf keeps its whole ancestor path reachable.
///
/// Structural only: field values and expansion flags pass through
/// untouched, and the input is never mutated.
pub fn filter_tree(tasks: &[Task], search: &str, filters: &[FilterRule]) -> Vec<Task> {
    let mut kept = Vec::new();
    for task in tasks {
        let children = filter_tree(&task.children, search, filters);
        if matches_directly(task, search, filters) || !children.is_empty() {
            let mut task = task.clone();
            task.children = children;
            kept.push(task);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Priority, Status};
    use crate::model::view::FilterValue;
    use pretty_assertions::assert_eq;

    fn rule(column: &str, operator: FilterOperator, value: &str) -> FilterRule {
        FilterRule::new(column, operator, value)
    }

    fn tree() -> Vec<Task> {
        // 1 Website redesign
        //   2 Draft wireframes      (in_progress, high)
        //   3 Review copy           (in_review)
        // 4 Data migration          (completed)
        let mut root = Task::new(1, "Website redesign");
        let mut draft = Task::new(2, "Draft wireframes");
        draft.status = Status::InProgress;
        draft.priority = Some(Priority::High);
        let mut review = Task::new(3, "Review copy");
        review.status = Status::InReview;
        root.children = vec![draft, review];

        let mut migration = Task::new(4, "Data migration");
        migration.status = Status::Completed;
        vec![root, migration]
    }

    // --- Search term ---

    #[test]
    fn empty_search_matches_everything() {
        for task in &tree() {
            assert!(matches_search(task, ""));
        }
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let task = Task::new(1, "Website redesign");
        assert!(matches_search(&task, "REDESIGN"));
        assert!(matches_search(&task, "site re"));
        assert!(!matches_search(&task, "backend"));
    }

    // --- Rule evaluation ---

    #[test]
    fn is_and_is_not_compare_string_forms() {
        let mut task = Task::new(1, "T");
        task.status = Status::InProgress;
        assert!(matches_rule(&task, &rule("status", FilterOperator::Is, "in_progress")));
        assert!(matches_rule(&task, &rule("status", FilterOperator::Is, "IN_PROGRESS")));
        assert!(!matches_rule(&task, &rule("status", FilterOperator::Is, "new")));
        assert!(matches_rule(&task, &rule("status", FilterOperator::IsNot, "new")));
    }

    #[test]
    fn contains_tests_substrings() {
        let task = Task::new(1, "Draft wireframes");
        assert!(matches_rule(&task, &rule("name", FilterOperator::Contains, "wire")));
        assert!(!matches_rule(&task, &rule("name", FilterOperator::Contains, "copy")));
        assert!(matches_rule(&task, &rule("name", FilterOperator::NotContains, "copy")));
    }

    #[test]
    fn missing_field_satisfies_only_is_empty() {
        let task = Task::new(1, "No priority");
        assert!(matches_rule(&task, &rule("priority", FilterOperator::IsEmpty, "")));
        assert!(!matches_rule(&task, &rule("priority", FilterOperator::IsNotEmpty, "")));
        assert!(!matches_rule(&task, &rule("priority", FilterOperator::Is, "high")));
        assert!(!matches_rule(&task, &rule("priority", FilterOperator::Contains, "h")));
        // missing wins over fail-open: the field check runs first
        assert!(!matches_rule(&task, &rule("priority", FilterOperator::Unknown, "")));
    }

    #[test]
    fn blank_name_counts_as_empty() {
        let task = Task::new(1, "   ");
        assert!(matches_rule(&task, &rule("name", FilterOperator::IsEmpty, "")));
        assert!(!matches_rule(&task, &rule("name", FilterOperator::IsNotEmpty, "")));
    }

    #[test]
    fn unknown_operator_is_fail_open() {
        let task = Task::new(1, "Anything");
        assert!(matches_rule(&task, &rule("name", FilterOperator::Unknown, "zzz")));
    }

    #[test]
    fn unknown_column_reads_as_missing() {
        let task = Task::new(1, "Anything");
        assert!(matches_rule(&task, &rule("estimate", FilterOperator::IsEmpty, "")));
        assert!(!matches_rule(&task, &rule("estimate", FilterOperator::Is, "5")));
    }

    #[test]
    fn any_of_and_none_of_use_the_list() {
        let mut task = Task::new(1, "T");
        task.status = Status::Planned;
        let any = FilterRule {
            column: "status".into(),
            operator: FilterOperator::IsAnyOf,
            value: FilterValue::Many(vec!["new".into(), "planned".into()]),
        };
        assert!(matches_rule(&task, &any));

        let none = FilterRule {
            column: "status".into(),
            operator: FilterOperator::IsNoneOf,
            value: FilterValue::Many(vec!["new".into(), "planned".into()]),
        };
        assert!(!matches_rule(&task, &none));

        task.status = Status::Completed;
        assert!(!matches_rule(&task, &any));
        assert!(matches_rule(&task, &none));
    }

    #[test]
    fn rules_are_and_ed() {
        let mut task = Task::new(1, "Draft wireframes");
        task.status = Status::InProgress;
        let rules = vec![
            rule("status", FilterOperator::Is, "in_progress"),
            rule("name", FilterOperator::Contains, "draft"),
        ];
        assert!(matches_directly(&task, "", &rules));

        let rules = vec![
            rule("status", FilterOperator::Is, "in_progress"),
            rule("name", FilterOperator::Contains, "copy"),
        ];
        assert!(!matches_directly(&task, "", &rules));
    }

    #[test]
    fn direct_match_needs_search_and_rules() {
        let mut task = Task::new(1, "Draft wireframes");
        task.status = Status::InProgress;
        let rules = vec![rule("status", FilterOperator::Is, "in_progress")];
        assert!(matches_directly(&task, "wire", &rules));
        assert!(!matches_directly(&task, "copy", &rules));
    }

    // --- Tree filter ---

    #[test]
    fn leaf_match_keeps_ancestor_path() {
        // Root doesn't match "in_review" itself, but Review copy does
        let kept = filter_tree(&tree(), "", &[rule("status", FilterOperator::Is, "in_review")]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 1);
        assert_eq!(kept[0].children.len(), 1);
        assert_eq!(kept[0].children[0].id, 3);
    }

    #[test]
    fn non_matching_leaves_are_dropped() {
        let kept = filter_tree(&tree(), "", &[rule("status", FilterOperator::Is, "completed")]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 4);
        assert!(kept[0].children.is_empty());
    }

    #[test]
    fn matching_parent_keeps_only_matching_children() {
        // Root matches by name; children are still pruned by the rule
        let kept = filter_tree(
            &tree(),
            "redesign",
            &[rule("status", FilterOperator::Is, "in_progress")],
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].children.len(), 1);
        assert_eq!(kept[0].children[0].id, 2);
    }

    #[test]
    fn filtering_never_touches_fields_or_expansion() {
        let mut input = tree();
        input[0].is_expanded = false;
        let kept = filter_tree(&input, "", &[]);
        assert_eq!(kept, input);
        assert!(!kept[0].is_expanded);
    }

    #[test]
    fn filter_is_idempotent() {
        let rules = vec![rule("status", FilterOperator::IsNot, "completed")];
        let once = filter_tree(&tree(), "", &rules);
        let twice = filter_tree(&once, "", &rules);
        assert_eq!(once, twice);
    }
}
