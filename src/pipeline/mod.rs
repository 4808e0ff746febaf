//! The task-tree derivation pipeline.
//!
//! Every view renders from the same raw task tree plus its own view
//! configuration (filter rules, one optional sort rule, a transient search
//! term). This module derives everything a view needs:
//!
//! 1. filter — prune the tree, keeping direct matches and their ancestors
//! 2. sort — reorder every sibling group by the active sort rule
//! 3. number — assign stable 1-based row numbers to the whole derived tree
//! 4. visibility — flatten to the ids actually rendered, honoring collapse
//!
//! All four stages are pure: inputs are never mutated, outputs are freshly
//! built, and identical inputs produce value-equal outputs, so callers may
//! cache a `DerivedView` and recompute only when the tree or the view
//! configuration changes. Nothing here fails — unknown columns read as
//! missing fields, unknown operators match unconditionally, malformed
//! dates read as absent.

pub mod field;
pub mod filter;
pub mod rows;
pub mod sort;

use indexmap::IndexMap;

use crate::model::task::{Task, TaskId};
use crate::model::view::ViewConfig;

/// Everything a view derives from the raw tree + its configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView {
    /// The filtered and sorted tree, in render order
    pub tasks: Vec<Task>,
    /// Ids of rows currently rendered, respecting collapse state
    pub visible_ids: Vec<TaskId>,
    /// Task id → 1-based row number, stable across collapse/expand;
    /// iterates in document order
    pub row_numbers: IndexMap<TaskId, usize>,
}

impl DerivedView {
    /// Number of rows currently rendered
    pub fn visible_len(&self) -> usize {
        self.visible_ids.len()
    }

    /// Total rows in the derived tree, collapsed or not
    pub fn total_len(&self) -> usize {
        self.row_numbers.len()
    }
}

/// Run the full pipeline for one view.
pub fn derive_view(tasks: &[Task], view: &ViewConfig, search: &str) -> DerivedView {
    let filtered = filter::filter_tree(tasks, search, &view.filters);
    let sorted = sort::sort_tree(&filtered, view.sort.as_ref());
    let row_numbers = rows::number_rows(&sorted);
    let visible_ids = rows::visible_ids(&sorted);
    DerivedView {
        tasks: sorted,
        visible_ids,
        row_numbers,
    }
}
