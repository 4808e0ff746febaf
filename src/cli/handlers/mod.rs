mod init;
pub use init::cmd_init;

use std::path::PathBuf;
use std::sync::Mutex;

use regex::Regex;

/// Global override for project directory (set by -C flag)
static PROJECT_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::lock::DeckLock;
use crate::io::project_io::{self, ProjectError};
use crate::model::project::Project;
use crate::model::task::{count_tasks, find_task};
use crate::model::view::{FilterOperator, FilterRule, FilterValue, ViewConfig, ViewKind};
use crate::ops::{search, stats, task_ops, view_ops};
use crate::pipeline;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;

    // Store -C override for load_project_cwd()
    if let Some(ref dir) = cli.project_dir {
        let abs = std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?;
        PROJECT_DIR_OVERRIDE.lock().unwrap().replace(abs);
    }

    match cli.command {
        // No subcommand (TUI) and `init` are handled in main.rs
        None => Ok(()),
        Some(cmd) => match cmd {
            Commands::Init(args) => cmd_init(args),

            // Read commands
            Commands::List(args) => cmd_list(args, json),
            Commands::Show(args) => cmd_show(args, json),
            Commands::Search(args) => cmd_search(args, json),
            Commands::Views => cmd_views(json),
            Commands::Stats => cmd_stats(json),

            // Write commands
            Commands::Add(args) => cmd_add(args),
            Commands::Sub(args) => cmd_sub(args),
            Commands::Status(args) => cmd_status(args),
            Commands::Priority(args) => cmd_priority(args),
            Commands::Impact(args) => cmd_impact(args),
            Commands::Due(args) => cmd_due(args),
            Commands::Start(args) => cmd_start(args),
            Commands::Progress(args) => cmd_progress(args),
            Commands::Rename(args) => cmd_rename(args),
            Commands::Remove(args) => cmd_remove(args),
            Commands::Toggle(args) => cmd_toggle(args),
            Commands::Mv(args) => cmd_mv(args),

            // View management
            Commands::View(args) => cmd_view(args),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_project_cwd() -> Result<Project, ProjectError> {
    let start = match PROJECT_DIR_OVERRIDE.lock().unwrap().as_ref() {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(ProjectError::Io)?,
    };
    let root = project_io::discover_project(&start)?;
    project_io::load_project(&root)
}

/// Resolve the view to render through: the named one, or the default
fn resolve_view<'a>(
    project: &'a Project,
    id: Option<&str>,
) -> Result<&'a ViewConfig, Box<dyn std::error::Error>> {
    match id {
        Some(id) => project
            .view(id)
            .ok_or_else(|| format!("view not found: {} (try `td views`)", id).into()),
        None => project
            .default_view()
            .ok_or_else(|| "project has no views (try `td view create`)".into()),
    }
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let project = load_project_cwd()?;
    let view = resolve_view(&project, args.view.as_deref())?;
    let search = args.search.as_deref().unwrap_or("");

    let derived = pipeline::derive_view(&project.tasks, view, search);

    if json {
        let output = list_to_json(&view.id, &derived);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for line in format_rows(&derived) {
            println!("{}", line);
        }
        if derived.total_len() > derived.visible_len() {
            println!(
                "({} of {} rows shown; collapsed subtrees hidden)",
                derived.visible_len(),
                derived.total_len()
            );
        }
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let project = load_project_cwd()?;
    let task = find_task(&project.tasks, args.id)
        .ok_or_else(|| format!("task not found: #{}", args.id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(task)?);
    } else {
        for line in format_task_detail(task) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_search(args: SearchArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let project = load_project_cwd()?;
    let re = Regex::new(&args.pattern)?;
    let hits = search::search_tasks(&project.tasks, &re);

    if json {
        let output: Vec<SearchHitJson> = hits.iter().map(hit_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for hit in &hits {
            if let Some(task) = find_task(&project.tasks, hit.task_id) {
                println!("#{} {} ({})", hit.task_id, task.name, hit.field.as_str());
            }
        }
    }
    Ok(())
}

fn cmd_views(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let project = load_project_cwd()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&project.views)?);
    } else {
        for view in &project.views {
            println!("{}", format_view_line(view));
        }
    }
    Ok(())
}

fn cmd_stats(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let project = load_project_cwd()?;
    let today = chrono::Local::now().date_naive();
    let stats = stats::compute_stats(&project.tasks, today);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats_to_json(&stats))?);
    } else {
        let c = &stats.counts;
        println!(
            " new {}  planned {}  in progress {}  in review {}  completed {}",
            c.new, c.planned, c.in_progress, c.in_review, c.completed
        );
        println!(
            " {} tasks, {}% done, {} overdue",
            c.total(),
            stats.done_percent(),
            stats.overdue
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut project = load_project_cwd()?;
    let _lock = DeckLock::acquire_default(&project.deck_dir)?;

    let id = task_ops::add_task(&mut project.tasks, args.name);

    project_io::save_tasks(&project.deck_dir, &project.tasks)?;
    println!("{}", id);
    Ok(())
}

fn cmd_sub(args: SubArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut project = load_project_cwd()?;
    let _lock = DeckLock::acquire_default(&project.deck_dir)?;

    let id = task_ops::add_subtask(&mut project.tasks, args.id, args.name)?;

    project_io::save_tasks(&project.deck_dir, &project.tasks)?;
    println!("{}", id);
    Ok(())
}

fn cmd_status(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut project = load_project_cwd()?;
    let _lock = DeckLock::acquire_default(&project.deck_dir)?;

    let status = parse_status(&args.status)?;
    task_ops::set_status(&mut project.tasks, args.id, status)?;

    project_io::save_tasks(&project.deck_dir, &project.tasks)?;
    println!("#{} → {}", args.id, status.label());
    Ok(())
}

fn cmd_priority(args: PriorityArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut project = load_project_cwd()?;
    let _lock = DeckLock::acquire_default(&project.deck_dir)?;

    let priority = match (&args.priority, args.clear) {
        (_, true) => None,
        (Some(p), false) => Some(parse_priority(p)?),
        (None, false) => return Err("specify a priority or --clear".into()),
    };
    task_ops::set_priority(&mut project.tasks, args.id, priority)?;

    project_io::save_tasks(&project.deck_dir, &project.tasks)?;
    match priority {
        Some(p) => println!("#{} priority → {}", args.id, p.as_str()),
        None => println!("#{} priority cleared", args.id),
    }
    Ok(())
}

fn cmd_impact(args: ImpactArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut project = load_project_cwd()?;
    let _lock = DeckLock::acquire_default(&project.deck_dir)?;

    let impact = match (&args.impact, args.clear) {
        (_, true) => None,
        (Some(i), false) => Some(parse_impact(i)?),
        (None, false) => return Err("specify an impact or --clear".into()),
    };
    task_ops::set_impact(&mut project.tasks, args.id, impact)?;

    project_io::save_tasks(&project.deck_dir, &project.tasks)?;
    match impact {
        Some(i) => println!("#{} impact → {}", args.id, i.as_str()),
        None => println!("#{} impact cleared", args.id),
    }
    Ok(())
}

fn cmd_due(args: DueArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut project = load_project_cwd()?;
    let _lock = DeckLock::acquire_default(&project.deck_dir)?;

    let date = match (args.date, args.clear) {
        (_, true) => None,
        (Some(d), false) => Some(d),
        (None, false) => return Err("specify a date or --clear".into()),
    };
    task_ops::set_due_date(&mut project.tasks, args.id, date.clone())?;

    project_io::save_tasks(&project.deck_dir, &project.tasks)?;
    match date {
        Some(d) => println!("#{} due → {}", args.id, d),
        None => println!("#{} due date cleared", args.id),
    }
    Ok(())
}

fn cmd_start(args: StartArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut project = load_project_cwd()?;
    let _lock = DeckLock::acquire_default(&project.deck_dir)?;

    let date = match (args.date, args.clear) {
        (_, true) => None,
        (Some(d), false) => Some(d),
        (None, false) => return Err("specify a date or --clear".into()),
    };
    task_ops::set_start_date(&mut project.tasks, args.id, date.clone())?;

    project_io::save_tasks(&project.deck_dir, &project.tasks)?;
    match date {
        Some(d) => println!("#{} start → {}", args.id, d),
        None => println!("#{} start date cleared", args.id),
    }
    Ok(())
}

fn cmd_progress(args: ProgressArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut project = load_project_cwd()?;
    let _lock = DeckLock::acquire_default(&project.deck_dir)?;

    task_ops::set_progress(&mut project.tasks, args.id, args.percent)?;

    project_io::save_tasks(&project.deck_dir, &project.tasks)?;
    println!("#{} → {}%", args.id, args.percent);
    Ok(())
}

fn cmd_rename(args: RenameArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut project = load_project_cwd()?;
    let _lock = DeckLock::acquire_default(&project.deck_dir)?;

    task_ops::rename(&mut project.tasks, args.id, args.name)?;

    project_io::save_tasks(&project.deck_dir, &project.tasks)?;
    println!("#{} renamed", args.id);
    Ok(())
}

fn cmd_remove(args: RemoveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut project = load_project_cwd()?;
    let _lock = DeckLock::acquire_default(&project.deck_dir)?;

    let removed = task_ops::remove_task(&mut project.tasks, args.id)?;
    let count = 1 + count_tasks(&removed.children);

    project_io::save_tasks(&project.deck_dir, &project.tasks)?;
    if count == 1 {
        println!("removed #{}", args.id);
    } else {
        println!("removed #{} ({} tasks)", args.id, count);
    }
    Ok(())
}

fn cmd_toggle(args: ToggleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut project = load_project_cwd()?;
    let _lock = DeckLock::acquire_default(&project.deck_dir)?;

    let expanded = task_ops::toggle_expanded(&mut project.tasks, args.id)?;

    project_io::save_tasks(&project.deck_dir, &project.tasks)?;
    println!(
        "#{} {}",
        args.id,
        if expanded { "expanded" } else { "collapsed" }
    );
    Ok(())
}

fn cmd_mv(args: MvArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut project = load_project_cwd()?;
    let _lock = DeckLock::acquire_default(&project.deck_dir)?;

    match args.direction.as_str() {
        "up" => task_ops::move_up(&mut project.tasks, args.id)?,
        "down" => task_ops::move_down(&mut project.tasks, args.id)?,
        other => {
            return Err(format!("unknown direction '{}' (expected: up, down)", other).into());
        }
    }

    project_io::save_tasks(&project.deck_dir, &project.tasks)?;
    println!("#{} moved {}", args.id, args.direction);
    Ok(())
}

// ---------------------------------------------------------------------------
// View management handlers
// ---------------------------------------------------------------------------

fn cmd_view(args: ViewCmd) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        ViewAction::Create(a) => cmd_view_create(a),
        ViewAction::Rename(a) => cmd_view_rename(a),
        ViewAction::Delete(a) => cmd_view_delete(a),
        ViewAction::Sort(a) => cmd_view_sort(a),
        ViewAction::Filter(a) => cmd_view_filter(a),
    }
}

fn cmd_view_create(args: ViewCreateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut project = load_project_cwd()?;
    let _lock = DeckLock::acquire_default(&project.deck_dir)?;

    let kind = if args.board {
        ViewKind::Board
    } else {
        ViewKind::Table
    };
    view_ops::add_view(&mut project.views, args.id.clone(), args.name, kind)?;

    project_io::save_views(&project.deck_dir, &project.views)?;
    println!("created view: {} [{}]", args.id, kind);
    Ok(())
}

fn cmd_view_rename(args: ViewRenameArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut project = load_project_cwd()?;
    let _lock = DeckLock::acquire_default(&project.deck_dir)?;

    view_ops::rename_view(&mut project.views, &args.id, args.name)?;

    project_io::save_views(&project.deck_dir, &project.views)?;
    println!("{} renamed", args.id);
    Ok(())
}

fn cmd_view_delete(args: ViewIdArg) -> Result<(), Box<dyn std::error::Error>> {
    let mut project = load_project_cwd()?;
    let _lock = DeckLock::acquire_default(&project.deck_dir)?;

    view_ops::remove_view(&mut project.views, &args.id)?;

    project_io::save_views(&project.deck_dir, &project.views)?;
    println!("deleted view: {}", args.id);
    Ok(())
}

fn cmd_view_sort(args: ViewSortArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut project = load_project_cwd()?;
    let _lock = DeckLock::acquire_default(&project.deck_dir)?;

    if args.clear {
        view_ops::set_sort(&mut project.views, &args.id, None)?;
    } else {
        let column = args.column.as_deref().ok_or("specify a column or --clear")?;
        view_ops::toggle_sort(&mut project.views, &args.id, column)?;
    }

    let sort = project.view(&args.id).and_then(|v| v.sort.clone());
    project_io::save_views(&project.deck_dir, &project.views)?;
    match sort {
        Some(spec) => {
            let dir = match spec.direction {
                crate::model::view::SortDirection::Asc => "asc",
                crate::model::view::SortDirection::Desc => "desc",
            };
            println!("{} sort → {} {}", args.id, spec.column, dir);
        }
        None => println!("{} sort off", args.id),
    }
    Ok(())
}

fn cmd_view_filter(args: ViewFilterCmd) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        ViewFilterAction::Add(a) => cmd_view_filter_add(a),
        ViewFilterAction::Rm(a) => cmd_view_filter_rm(a),
        ViewFilterAction::Clear(a) => cmd_view_filter_clear(a),
    }
}

fn cmd_view_filter_add(args: ViewFilterAddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut project = load_project_cwd()?;
    let _lock = DeckLock::acquire_default(&project.deck_dir)?;

    let operator = parse_operator(&args.operator)?;
    let value = match operator {
        // Emptiness operators ignore the value entirely
        FilterOperator::IsEmpty | FilterOperator::IsNotEmpty => FilterValue::default(),
        FilterOperator::IsAnyOf | FilterOperator::IsNoneOf => FilterValue::Many(args.values),
        _ => FilterValue::One(args.values.into_iter().next().unwrap_or_default()),
    };
    let rule = FilterRule {
        column: args.column.clone(),
        operator,
        value,
    };
    view_ops::add_filter(&mut project.views, &args.id, rule)?;

    project_io::save_views(&project.deck_dir, &project.views)?;
    println!("{} filter added: {} {}", args.id, args.column, args.operator);
    Ok(())
}

fn cmd_view_filter_rm(args: ViewFilterRmArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut project = load_project_cwd()?;
    let _lock = DeckLock::acquire_default(&project.deck_dir)?;

    view_ops::remove_filter(&mut project.views, &args.id, args.index)?;

    project_io::save_views(&project.deck_dir, &project.views)?;
    println!("{} filter {} removed", args.id, args.index);
    Ok(())
}

fn cmd_view_filter_clear(args: ViewIdArg) -> Result<(), Box<dyn std::error::Error>> {
    let mut project = load_project_cwd()?;
    let _lock = DeckLock::acquire_default(&project.deck_dir)?;

    view_ops::clear_filters(&mut project.views, &args.id)?;

    project_io::save_views(&project.deck_dir, &project.views)?;
    println!("{} filters cleared", args.id);
    Ok(())
}
