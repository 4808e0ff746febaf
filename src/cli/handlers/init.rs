use std::fs;

use crate::cli::commands::InitArgs;
use crate::io::project_io;
use crate::model::task::{
    Assignee, HealthIndicator, HealthStatus, Impact, Priority, Progress, Status, Task,
};
use crate::model::view::default_views;

const PROJECT_TOML_TEMPLATE: &str = r##"[project]
name = "{name}"

# --- UI Customization ---
# Uncomment and edit to override defaults.

# [ui]
# default_view = "all"            # view id to open on launch
# show_key_hints = false
#
# [ui.colors]
# background = "#0C001B"
# text = "#A09BFE"
# text_bright = "#FFFFFF"
# highlight = "#FB4196"
# dim = "#5A5580"
# red = "#FF4444"
# yellow = "#FFD700"
# green = "#44FF88"
# cyan = "#44DDFF"
#
# [ui.status_colors]
# new = "#A09BFE"
# planned = "#44DDFF"
# in_progress = "#FFD700"
# in_review = "#FB4196"
# completed = "#44FF88"
"##;

/// Infer a project name from a directory name: replace hyphens with spaces, title-case.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    upper + &chars.collect::<String>()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The seed tree written by `td init --sample`: enough shape to exercise
/// nesting, collapse, and every column in the table view.
fn sample_tasks() -> Vec<Task> {
    let ana = Assignee {
        id: 1,
        name: "Ana Flores".into(),
        initials: "AF".into(),
        color: "#44DDFF".into(),
    };
    let ben = Assignee {
        id: 2,
        name: "Ben Okafor".into(),
        initials: "BO".into(),
        color: "#FB4196".into(),
    };

    let mut wireframes = Task::new(2, "Draft wireframes");
    wireframes.status = Status::InProgress;
    wireframes.priority = Some(Priority::High);
    wireframes.due_date = Some("15/09/2026".into());
    wireframes.assignees.push(ana.clone());
    wireframes.progress = Some(Progress {
        percent: 60,
        history: vec![20, 40],
    });

    let mut copy = Task::new(3, "Review landing copy");
    copy.status = Status::Planned;
    copy.priority = Some(Priority::Medium);
    copy.assignees.push(ben.clone());

    let mut redesign = Task::new(1, "Website redesign");
    redesign.status = Status::InProgress;
    redesign.priority = Some(Priority::High);
    redesign.impact = Some(Impact::High);
    redesign.start_date = Some("01/09/2026".into());
    redesign.due_date = Some("30/09/2026".into());
    redesign.health.push(HealthIndicator {
        label: "Scope".into(),
        status: HealthStatus::AtRisk,
        detail: "Copy review still unscheduled".into(),
    });
    redesign.children = vec![wireframes, copy];

    let mut migration = Task::new(4, "Data migration");
    migration.status = Status::Completed;
    migration.priority = Some(Priority::Low);
    migration.assignees.push(ben);
    migration.progress = Some(Progress {
        percent: 100,
        history: vec![50, 80],
    });

    let mut onboarding = Task::new(5, "Onboarding flow");
    onboarding.status = Status::New;
    onboarding.impact = Some(Impact::Medium);
    onboarding.assignees.push(ana);

    vec![redesign, migration, onboarding]
}

pub fn cmd_init(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let deck_dir = cwd.join("deck");

    if deck_dir.is_dir() && !args.force {
        return Err("taskdeck project already exists in ./deck/ (use --force to reinitialize)".into());
    }

    // Warn if a parent directory already holds a project
    if let Some(parent) = cwd.parent()
        && let Ok(parent_root) = project_io::discover_project(parent)
    {
        eprintln!(
            "Note: parent project found at {}/deck/",
            parent_root.display()
        );
        eprintln!("Creating new project in ./deck/");
    }

    let name = args.name.unwrap_or_else(|| {
        cwd.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .unwrap_or_else(|| "Untitled".to_string())
    });

    fs::create_dir_all(&deck_dir)?;

    let toml_content = PROJECT_TOML_TEMPLATE.replace("{name}", &name);
    fs::write(deck_dir.join(project_io::CONFIG_FILE), toml_content)?;

    project_io::save_views(&deck_dir, &default_views())?;

    let task_count = if args.sample {
        let tasks = sample_tasks();
        project_io::save_tasks(&deck_dir, &tasks)?;
        crate::model::task::count_tasks(&tasks)
    } else {
        0
    };

    println!("Initialized taskdeck project: {}", name);
    if task_count > 0 {
        println!("  seeded {} sample tasks", task_count);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::next_task_id;

    #[test]
    fn infer_name_title_cases_hyphenated_dirs() {
        assert_eq!(infer_name("my-cool-project"), "My Cool Project");
        assert_eq!(infer_name("taskdeck"), "Taskdeck");
        assert_eq!(infer_name("q3-launch"), "Q3 Launch");
    }

    #[test]
    fn sample_tree_has_unique_ids_and_nesting() {
        let tasks = sample_tasks();
        // next_task_id scans every level; 4 roots-or-children ids max at 5
        assert_eq!(next_task_id(&tasks), 6);
        assert!(tasks[0].has_children());
    }

    #[test]
    fn template_parses_as_valid_config() {
        let text = PROJECT_TOML_TEMPLATE.replace("{name}", "Demo");
        let config: crate::model::config::DeckConfig = toml::from_str(&text).unwrap();
        assert_eq!(config.project.name, "Demo");
        assert!(config.ui.colors.is_empty());
    }
}
