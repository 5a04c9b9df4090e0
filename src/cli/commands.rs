use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "td", about = concat!("taskdeck v", env!("CARGO_PKG_VERSION"), " - tasks, sorted"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks grouped by category
    List(ListArgs),
    /// Show task details
    Show(ShowArgs),
    /// Add a task
    Add(AddArgs),
    /// Edit a task's title, description, due date or priority
    Edit(EditArgs),
    /// Mark a task complete, or pending again
    Toggle(ToggleArgs),
    /// Delete a task
    Rm(RmArgs),
    /// Move a task to another category
    Mv(MvArgs),
    /// Set the order of the tasks in a category
    Reorder(ReorderArgs),
    /// Category management
    Category(CategoryCmd),
    /// Show completion progress
    Progress,
    /// Show or change the dark mode preference
    Theme(ThemeArgs),
    /// Watch for tasks nearing their deadline
    Watch(WatchArgs),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Only this category (default: all, in registry order)
    #[arg(long)]
    pub category: Option<String>,
    /// Case-insensitive text to find in title or description
    #[arg(long, short)]
    pub search: Option<String>,
    /// Filter by status (all, completed, pending)
    #[arg(long, default_value = "all")]
    pub status: String,
    /// Only tasks due on this day (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
}

/// What bare `td` lists; mirrors the clap defaults above
impl Default for ListArgs {
    fn default() -> Self {
        ListArgs {
            category: None,
            search: None,
            status: "all".to_string(),
            date: None,
        }
    }
}

#[derive(Args)]
pub struct ShowArgs {
    /// Task ID
    pub id: String,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Longer description
    #[arg(long, short)]
    pub description: Option<String>,
    /// Due date (YYYY-MM-DD, YYYY-MM-DD HH:MM, or RFC 3339)
    #[arg(long)]
    pub due: Option<String>,
    /// Priority (low, medium, high)
    #[arg(long, short, default_value = "low")]
    pub priority: String,
    /// Category (default: first category alphabetically)
    #[arg(long, short)]
    pub category: Option<String>,
    /// Register the category first if it does not exist
    #[arg(long)]
    pub new_category: bool,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New description
    #[arg(long, short, conflicts_with = "clear_description")]
    pub description: Option<String>,
    /// Remove the description
    #[arg(long)]
    pub clear_description: bool,
    /// New due date
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<String>,
    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
    /// New priority
    #[arg(long, short)]
    pub priority: Option<String>,
}

#[derive(Args)]
pub struct ToggleArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct RmArgs {
    /// Task ID
    pub id: String,
    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Args)]
pub struct MvArgs {
    /// Task ID
    pub id: String,
    /// Destination category
    pub category: String,
}

#[derive(Args)]
pub struct ReorderArgs {
    /// Category to reorder
    pub category: String,
    /// Every task ID in the category, in the new order
    #[arg(required = true)]
    pub ids: Vec<String>,
}

// ---------------------------------------------------------------------------
// Category management
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct CategoryCmd {
    #[command(subcommand)]
    pub action: CategoryAction,
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// List categories
    List(CategoryListArgs),
    /// Add a category
    Add(CategoryAddArgs),
    /// Rename a category (its tasks follow)
    Rename(CategoryRenameArgs),
    /// Delete an empty category
    Rm(CategoryRmArgs),
}

#[derive(Args)]
pub struct CategoryListArgs {
    /// Alphabetical order instead of display order
    #[arg(long)]
    pub sorted: bool,
}

#[derive(Args)]
pub struct CategoryAddArgs {
    pub name: String,
}

#[derive(Args)]
pub struct CategoryRenameArgs {
    pub old: String,
    pub new: String,
}

#[derive(Args)]
pub struct CategoryRmArgs {
    pub name: String,
    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

// ---------------------------------------------------------------------------
// Preferences and background
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ThemeArgs {
    /// dark, light, or toggle (omit to show the current setting)
    pub mode: Option<String>,
}

#[derive(Args)]
pub struct WatchArgs {
    /// Stop after this many ticks (default: run until interrupted)
    #[arg(long)]
    pub count: Option<usize>,
    /// Seconds between ticks (default: from config)
    #[arg(long)]
    pub interval: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_default_matches_parsed_defaults() {
        let cli = Cli::try_parse_from(["td", "list"]).unwrap();
        let Some(Commands::List(parsed)) = cli.command else {
            panic!("expected the list command");
        };
        let default = ListArgs::default();
        assert_eq!(parsed.status, default.status);
        assert_eq!(parsed.category, default.category);
        assert_eq!(parsed.search, default.search);
        assert_eq!(parsed.date, default.date);
    }
}
