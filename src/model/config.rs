use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Configuration from deck/project.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckConfig {
    pub project: ProjectInfo,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// View id to open on launch (first saved view if absent)
    #[serde(default)]
    pub default_view: Option<String>,
    #[serde(default)]
    pub show_key_hints: bool,
    /// Base palette overrides, keyed by theme slot name
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Per-status color overrides for table cells and board columns
    #[serde(default)]
    pub status_colors: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_parses() {
        let config: DeckConfig = toml::from_str("[project]\nname = \"demo\"\n").unwrap();
        assert_eq!(config.project.name, "demo");
        assert!(config.ui.default_view.is_none());
        assert!(config.ui.colors.is_empty());
    }

    #[test]
    fn ui_overrides_parse() {
        let config: DeckConfig = toml::from_str(
            r##"
[project]
name = "demo"

[ui]
default_view = "board"
show_key_hints = true

[ui.colors]
background = "#101020"

[ui.status_colors]
in_progress = "#FFD700"
"##,
        )
        .unwrap();
        assert_eq!(config.ui.default_view.as_deref(), Some("board"));
        assert!(config.ui.show_key_hints);
        assert_eq!(config.ui.colors["background"], "#101020");
        assert_eq!(config.ui.status_colors["in_progress"], "#FFD700");
    }
}
