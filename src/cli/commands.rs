use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "td", about = concat!("[#] taskdeck v", env!("CARGO_PKG_VERSION"), " - one task tree, many views"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different project directory
    #[arg(short = 'C', long = "project-dir", global = true)]
    pub project_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new taskdeck project in the current directory
    Init(InitArgs),
    /// List tasks through a saved view
    List(ListArgs),
    /// Show task details
    Show(ShowArgs),
    /// Search tasks by regex
    Search(SearchArgs),
    /// List saved views
    Views,
    /// Show task statistics
    Stats,
    /// Add a top-level task
    Add(AddArgs),
    /// Add a subtask
    Sub(SubArgs),
    /// Change task status
    Status(StatusArgs),
    /// Set or clear task priority
    Priority(PriorityArgs),
    /// Set or clear task impact
    Impact(ImpactArgs),
    /// Set or clear the due date
    Due(DueArgs),
    /// Set or clear the start date
    Start(StartArgs),
    /// Set progress percentage
    Progress(ProgressArgs),
    /// Rename a task
    Rename(RenameArgs),
    /// Remove a task and its subtree
    Remove(RemoveArgs),
    /// Toggle a task's expand/collapse state
    Toggle(ToggleArgs),
    /// Move a task up or down among its siblings
    Mv(MvArgs),
    /// View management
    View(ViewCmd),
}

// ---------------------------------------------------------------------------
// Init args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Project name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Seed the project with a small sample task tree
    #[arg(long)]
    pub sample: bool,
    /// Reinitialize even if deck/ already exists
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// View to list through (default: the project's default view)
    pub view: Option<String>,
    /// Narrow rows with a search term (case-insensitive name substring)
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Task id to show
    pub id: u64,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Regex pattern to search for
    pub pattern: String,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task name
    pub name: String,
}

#[derive(Args)]
pub struct SubArgs {
    /// Parent task id
    pub id: u64,
    /// Subtask name
    pub name: String,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Task id
    pub id: u64,
    /// New status (new, planned, in_progress, in_review, completed)
    pub status: String,
}

#[derive(Args)]
pub struct PriorityArgs {
    /// Task id
    pub id: u64,
    /// Priority (urgent, high, medium, low, none; omit with --clear)
    pub priority: Option<String>,
    /// Remove the priority entirely
    #[arg(long)]
    pub clear: bool,
}

#[derive(Args)]
pub struct ImpactArgs {
    /// Task id
    pub id: u64,
    /// Impact (high, medium, low; omit with --clear)
    pub impact: Option<String>,
    /// Remove the impact entirely
    #[arg(long)]
    pub clear: bool,
}

#[derive(Args)]
pub struct DueArgs {
    /// Task id
    pub id: u64,
    /// Due date as dd/mm/yyyy (omit with --clear)
    pub date: Option<String>,
    /// Remove the due date
    #[arg(long)]
    pub clear: bool,
}

#[derive(Args)]
pub struct StartArgs {
    /// Task id
    pub id: u64,
    /// Start date as dd/mm/yyyy (omit with --clear)
    pub date: Option<String>,
    /// Remove the start date
    #[arg(long)]
    pub clear: bool,
}

#[derive(Args)]
pub struct ProgressArgs {
    /// Task id
    pub id: u64,
    /// Percentage complete (0-100)
    pub percent: u32,
}

#[derive(Args)]
pub struct RenameArgs {
    /// Task id
    pub id: u64,
    /// New name
    pub name: String,
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Task id
    pub id: u64,
}

#[derive(Args)]
pub struct ToggleArgs {
    /// Task id
    pub id: u64,
}

#[derive(Args)]
pub struct MvArgs {
    /// Task id
    pub id: u64,
    /// Direction: "up" or "down"
    pub direction: String,
}

// ---------------------------------------------------------------------------
// View management
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ViewCmd {
    #[command(subcommand)]
    pub action: ViewAction,
}

#[derive(Subcommand)]
pub enum ViewAction {
    /// Create a new view
    Create(ViewCreateArgs),
    /// Rename a view
    Rename(ViewRenameArgs),
    /// Delete a view
    Delete(ViewIdArg),
    /// Cycle a column's sort: asc, then desc, then off
    Sort(ViewSortArgs),
    /// Manage a view's filter rules
    Filter(ViewFilterCmd),
}

#[derive(Args)]
pub struct ViewCreateArgs {
    /// View id (short identifier)
    pub id: String,
    /// View name
    pub name: String,
    /// Create a board view instead of a table
    #[arg(long)]
    pub board: bool,
}

#[derive(Args)]
pub struct ViewRenameArgs {
    /// View id
    pub id: String,
    /// New display name
    pub name: String,
}

#[derive(Args)]
pub struct ViewIdArg {
    /// View id
    pub id: String,
}

#[derive(Args)]
pub struct ViewSortArgs {
    /// View id
    pub id: String,
    /// Column to sort on (name, status, priority, impact, assignees,
    /// start_date, due_date, progress; omit with --clear)
    pub column: Option<String>,
    /// Remove the sort rule
    #[arg(long)]
    pub clear: bool,
}

#[derive(Args)]
pub struct ViewFilterCmd {
    #[command(subcommand)]
    pub action: ViewFilterAction,
}

#[derive(Subcommand)]
pub enum ViewFilterAction {
    /// Append a filter rule
    Add(ViewFilterAddArgs),
    /// Remove one filter rule by index
    Rm(ViewFilterRmArgs),
    /// Remove all filter rules
    Clear(ViewIdArg),
}

#[derive(Args)]
pub struct ViewFilterAddArgs {
    /// View id
    pub id: String,
    /// Column the rule reads
    pub column: String,
    /// Operator (contains, not_contains, is, is_not, is_empty,
    /// is_not_empty, is_any_of, is_none_of)
    pub operator: String,
    /// Comparison value(s); multiple values for is_any_of / is_none_of
    pub values: Vec<String>,
}

#[derive(Args)]
pub struct ViewFilterRmArgs {
    /// View id
    pub id: String,
    /// Rule index (0-based, in the order `td views` prints them)
    pub index: usize,
}
