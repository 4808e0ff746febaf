use crate::model::view::{
    FilterRule, SortDirection, SortSpec, ViewConfig, ViewKind,
};

/// Error type for view-configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("view not found: {0}")]
    NotFound(String),
    #[error("view id already in use: {0}")]
    DuplicateId(String),
    #[error("cannot remove the last view")]
    LastView,
}

fn find_view_mut<'a>(views: &'a mut [ViewConfig], id: &str) -> Result<&'a mut ViewConfig, ViewError> {
    views
        .iter_mut()
        .find(|v| v.id == id)
        .ok_or_else(|| ViewError::NotFound(id.to_string()))
}

// ---------------------------------------------------------------------------
// View CRUD
// ---------------------------------------------------------------------------

pub fn add_view(
    views: &mut Vec<ViewConfig>,
    id: String,
    name: String,
    kind: ViewKind,
) -> Result<(), ViewError> {
    if views.iter().any(|v| v.id == id) {
        return Err(ViewError::DuplicateId(id));
    }
    views.push(ViewConfig::new(id, name, kind));
    Ok(())
}

pub fn rename_view(views: &mut [ViewConfig], id: &str, name: String) -> Result<(), ViewError> {
    find_view_mut(views, id)?.name = name;
    Ok(())
}

pub fn remove_view(views: &mut Vec<ViewConfig>, id: &str) -> Result<(), ViewError> {
    if views.len() == 1 {
        return Err(ViewError::LastView);
    }
    let pos = views
        .iter()
        .position(|v| v.id == id)
        .ok_or_else(|| ViewError::NotFound(id.to_string()))?;
    views.remove(pos);
    Ok(())
}

// ---------------------------------------------------------------------------
// Sort rule
// ---------------------------------------------------------------------------

pub fn set_sort(views: &mut [ViewConfig], id: &str, sort: Option<SortSpec>) -> Result<(), ViewError> {
    find_view_mut(views, id)?.sort = sort;
    Ok(())
}

/// Cycle the sort state of a column: none → asc → desc → none. Picking a
/// different column starts over at ascending.
pub fn toggle_sort(views: &mut [ViewConfig], id: &str, column: &str) -> Result<(), ViewError> {
    let view = find_view_mut(views, id)?;
    view.sort = match &view.sort {
        Some(spec) if spec.column == column => match spec.direction {
            SortDirection::Asc => Some(SortSpec {
                column: column.to_string(),
                direction: SortDirection::Desc,
            }),
            SortDirection::Desc => None,
        },
        _ => Some(SortSpec {
            column: column.to_string(),
            direction: SortDirection::Asc,
        }),
    };
    Ok(())
}

// ---------------------------------------------------------------------------
// Filter rules
// ---------------------------------------------------------------------------

pub fn add_filter(views: &mut [ViewConfig], id: &str, rule: FilterRule) -> Result<(), ViewError> {
    find_view_mut(views, id)?.filters.push(rule);
    Ok(())
}

/// Remove one rule by position in the view's ordered rule list
pub fn remove_filter(views: &mut [ViewConfig], id: &str, index: usize) -> Result<(), ViewError> {
    let view = find_view_mut(views, id)?;
    if index < view.filters.len() {
        view.filters.remove(index);
    }
    Ok(())
}

pub fn clear_filters(views: &mut [ViewConfig], id: &str) -> Result<(), ViewError> {
    find_view_mut(views, id)?.filters.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::view::{FilterOperator, default_views};

    #[test]
    fn add_rejects_duplicate_ids() {
        let mut views = default_views();
        add_view(&mut views, "sprint".into(), "Sprint".into(), ViewKind::Table).unwrap();
        assert!(matches!(
            add_view(&mut views, "sprint".into(), "Again".into(), ViewKind::Board),
            Err(ViewError::DuplicateId(_))
        ));
    }

    #[test]
    fn remove_keeps_at_least_one_view() {
        let mut views = default_views();
        remove_view(&mut views, "board").unwrap();
        assert!(matches!(
            remove_view(&mut views, "all"),
            Err(ViewError::LastView)
        ));
        assert!(matches!(
            remove_view(&mut views, "gone"),
            Err(ViewError::NotFound(_))
        ));
    }

    #[test]
    fn toggle_cycles_asc_desc_none() {
        let mut views = default_views();
        toggle_sort(&mut views, "all", "due_date").unwrap();
        assert_eq!(
            views[0].sort,
            Some(SortSpec {
                column: "due_date".into(),
                direction: SortDirection::Asc
            })
        );

        toggle_sort(&mut views, "all", "due_date").unwrap();
        assert_eq!(views[0].sort.as_ref().unwrap().direction, SortDirection::Desc);

        toggle_sort(&mut views, "all", "due_date").unwrap();
        assert!(views[0].sort.is_none());
    }

    #[test]
    fn toggle_on_new_column_restarts_ascending() {
        let mut views = default_views();
        toggle_sort(&mut views, "all", "due_date").unwrap();
        toggle_sort(&mut views, "all", "priority").unwrap();
        let sort = views[0].sort.as_ref().unwrap();
        assert_eq!(sort.column, "priority");
        assert_eq!(sort.direction, SortDirection::Asc);
    }

    #[test]
    fn filter_rules_append_remove_clear() {
        let mut views = default_views();
        add_filter(
            &mut views,
            "all",
            FilterRule::new("status", FilterOperator::IsNot, "completed"),
        )
        .unwrap();
        add_filter(
            &mut views,
            "all",
            FilterRule::new("priority", FilterOperator::Is, "urgent"),
        )
        .unwrap();
        assert_eq!(views[0].filters.len(), 2);

        remove_filter(&mut views, "all", 0).unwrap();
        assert_eq!(views[0].filters.len(), 1);
        assert_eq!(views[0].filters[0].column, "priority");

        // Out-of-range index is a no-op
        remove_filter(&mut views, "all", 9).unwrap();
        assert_eq!(views[0].filters.len(), 1);

        clear_filters(&mut views, "all").unwrap();
        assert!(views[0].filters.is_empty());
    }
}
