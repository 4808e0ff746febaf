use serde::{Deserialize, Serialize};

/// How a view renders the shared task tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Table,
    Board,
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewKind::Table => write!(f, "table"),
            ViewKind::Board => write!(f, "board"),
        }
    }
}

/// Sort direction for the single active sort rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// The at-most-one active sort rule of a view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Column identifier (see `pipeline::field::Column`)
    pub column: String,
    pub direction: SortDirection,
}

/// Filter predicate operator.
///
/// `Unknown` absorbs any operator string this build doesn't recognize so a
/// stale or hand-edited views file still loads; the evaluator treats it as
/// an unconditional match rather than hiding tasks behind a misconfigured
/// rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Contains,
    NotContains,
    Is,
    IsNot,
    IsEmpty,
    IsNotEmpty,
    IsAnyOf,
    IsNoneOf,
    #[serde(other)]
    Unknown,
}

/// A filter rule's comparison value: one string, or a list for the
/// multi-select operators. Emptiness operators ignore it entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    One(String),
    Many(Vec<String>),
}

impl Default for FilterValue {
    fn default() -> Self {
        FilterValue::One(String::new())
    }
}

impl FilterValue {
    /// The single-string form ("" when the value is a list)
    pub fn as_str(&self) -> &str {
        match self {
            FilterValue::One(s) => s,
            FilterValue::Many(_) => "",
        }
    }

    /// The list form (a one-element slice for a single string)
    pub fn as_list(&self) -> &[String] {
        match self {
            FilterValue::One(s) => std::slice::from_ref(s),
            FilterValue::Many(items) => items,
        }
    }
}

/// One predicate applied to every task node. Rules on a view are
/// implicitly AND-ed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    /// Task column the rule reads; an unknown id reads as a missing field
    pub column: String,
    pub operator: FilterOperator,
    #[serde(default)]
    pub value: FilterValue,
}

impl FilterRule {
    pub fn new(column: impl Into<String>, operator: FilterOperator, value: impl Into<String>) -> Self {
        FilterRule {
            column: column.into(),
            operator,
            value: FilterValue::One(value.into()),
        }
    }

    pub fn any_of(column: impl Into<String>, values: Vec<String>) -> Self {
        FilterRule {
            column: column.into(),
            operator: FilterOperator::IsAnyOf,
            value: FilterValue::Many(values),
        }
    }
}

/// One saved view: a rendering kind plus the filter/sort configuration the
/// derivation pipeline consumes read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub id: String,
    pub name: String,
    pub kind: ViewKind,
    #[serde(default)]
    pub filters: Vec<FilterRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
}

impl ViewConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ViewKind) -> Self {
        ViewConfig {
            id: id.into(),
            name: name.into(),
            kind,
            filters: Vec::new(),
            sort: None,
        }
    }
}

/// The views every new project starts with
pub fn default_views() -> Vec<ViewConfig> {
    vec![
        ViewConfig::new("all", "All Tasks", ViewKind::Table),
        ViewConfig::new("board", "Board", ViewKind::Board),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_deserializes_known_strings() {
        let op: FilterOperator = serde_json::from_str(r#""not_contains""#).unwrap();
        assert_eq!(op, FilterOperator::NotContains);
    }

    #[test]
    fn operator_falls_back_to_unknown() {
        let op: FilterOperator = serde_json::from_str(r#""starts_with""#).unwrap();
        assert_eq!(op, FilterOperator::Unknown);
    }

    #[test]
    fn filter_value_accepts_string_or_array() {
        let one: FilterValue = serde_json::from_str(r#""new""#).unwrap();
        assert_eq!(one.as_str(), "new");
        assert_eq!(one.as_list(), ["new".to_string()]);

        let many: FilterValue = serde_json::from_str(r#"["new", "planned"]"#).unwrap();
        assert_eq!(many.as_str(), "");
        assert_eq!(many.as_list().len(), 2);
    }

    #[test]
    fn rule_value_defaults_to_empty_string() {
        let rule: FilterRule =
            serde_json::from_str(r#"{"column": "name", "operator": "is_empty"}"#).unwrap();
        assert_eq!(rule.value, FilterValue::One(String::new()));
    }

    #[test]
    fn view_config_round_trip() {
        let mut view = ViewConfig::new("sprint", "Sprint 12", ViewKind::Table);
        view.filters
            .push(FilterRule::new("status", FilterOperator::IsNot, "completed"));
        view.sort = Some(SortSpec {
            column: "due_date".into(),
            direction: SortDirection::Asc,
        });

        let json = serde_json::to_string(&view).unwrap();
        let back: ViewConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, view);
    }

    #[test]
    fn default_views_cover_table_and_board() {
        let views = default_views();
        assert_eq!(views.len(), 2);
        assert!(views.iter().any(|v| v.kind == ViewKind::Table));
        assert!(views.iter().any(|v| v.kind == ViewKind::Board));
    }
}
