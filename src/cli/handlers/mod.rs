use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::lock::StoreLock;
use crate::io::persist;
use crate::io::store::DirStore;
use crate::io::ticker::{DeadlineTicker, TickEvent};
use crate::model::config::TrackerConfig;
use crate::model::task::{Priority, Task, TaskId};
use crate::ops::cheer;
use crate::ops::deadline;
use crate::ops::filter::{FilterCriteria, StatusFilter};
use crate::ops::task_ops::{self, NewTask};
use crate::tracker::{Notification, Tracker};
use crate::util::dates::{format_due, parse_day, parse_due};

/// Resolved data directory and its config, shared by every command
struct Context {
    data_dir: PathBuf,
    config: TrackerConfig,
}

impl Context {
    fn load(data_dir_flag: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        let data_dir = config_io::data_dir(data_dir_flag.map(Path::new));
        let config = config_io::read_config(&data_dir)?;
        debug!(data_dir = %data_dir.display(), "resolved data directory");
        Ok(Context { data_dir, config })
    }

    fn window(&self) -> Duration {
        Duration::minutes(i64::from(self.config.deadline.window_minutes))
    }

    /// Open the tracker under the store lock. Opening may seed and save, so
    /// read commands take the lock too.
    fn open(&self) -> Result<(Tracker<DirStore>, StoreLock), Box<dyn std::error::Error>> {
        let store = DirStore::open(&self.data_dir)?;
        let lock = StoreLock::acquire_default(&self.data_dir)?;
        let tracker = Tracker::open(store, &self.config)?;
        Ok((tracker, lock))
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let ctx = Context::load(cli.data_dir.as_deref())?;

    match cli.command {
        // No subcommand lists everything
        None => cmd_list(&ctx, ListArgs::default(), json),
        Some(cmd) => match cmd {
            // Read commands
            Commands::List(args) => cmd_list(&ctx, args, json),
            Commands::Show(args) => cmd_show(&ctx, args, json),
            Commands::Progress => cmd_progress(&ctx, json),

            // Write commands
            Commands::Add(args) => cmd_add(&ctx, args, json),
            Commands::Edit(args) => cmd_edit(&ctx, args, json),
            Commands::Toggle(args) => cmd_toggle(&ctx, args, json),
            Commands::Rm(args) => cmd_rm(&ctx, args),
            Commands::Mv(args) => cmd_mv(&ctx, args, json),
            Commands::Reorder(args) => cmd_reorder(&ctx, args),

            // Categories
            Commands::Category(cmd) => match cmd.action {
                CategoryAction::List(args) => cmd_category_list(&ctx, args, json),
                CategoryAction::Add(args) => cmd_category_add(&ctx, args),
                CategoryAction::Rename(args) => cmd_category_rename(&ctx, args),
                CategoryAction::Rm(args) => cmd_category_rm(&ctx, args),
            },

            // Preferences and background
            Commands::Theme(args) => cmd_theme(&ctx, args, json),
            Commands::Watch(args) => cmd_watch(&ctx, args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_id(s: &str) -> Result<TaskId, Box<dyn std::error::Error>> {
    s.parse()
        .map_err(|_| format!("invalid task id '{}'", s).into())
}

fn parse_priority_arg(s: &str) -> Result<Priority, Box<dyn std::error::Error>> {
    Priority::parse_priority(s).ok_or_else(|| {
        format!("unknown priority '{}' (expected: low, medium, high)", s).into()
    })
}

/// Ask on stderr, read y/n from stdin
fn confirm(prompt: &str) -> Result<bool, Box<dyn std::error::Error>> {
    eprint!("{} [y/n] ", prompt);
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn print_task(
    task: &Task,
    now: DateTime<Utc>,
    window: Duration,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let nearing = deadline::is_nearing_deadline(task, now, window);
    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(task, nearing))?);
    } else {
        for line in format_task_detail(task, nearing) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn print_cheers(tracker: &mut Tracker<DirStore>) {
    for note in tracker.drain_notifications() {
        match note {
            Notification::TaskCompleted { id, title } => {
                println!("completed {} {}", id, title);
                println!("{}", cheer::message_for(id));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(ctx: &Context, args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (tracker, lock) = ctx.open()?;
    drop(lock);

    let criteria = FilterCriteria {
        search: args.search.unwrap_or_default(),
        status: StatusFilter::parse_status(&args.status)?,
        date: args.date.as_deref().map(parse_day).transpose()?,
    };
    if let Some(ref category) = args.category
        && !tracker.board().categories.contains(category)
    {
        return Err(format!("unknown category: {}", category).into());
    }

    let now = Utc::now();
    let window = ctx.window();
    let nearing = |t: &Task| deadline::is_nearing_deadline(t, now, window);
    let sections: Vec<_> = tracker
        .sections(&criteria)
        .into_iter()
        .filter(|s| args.category.as_deref().is_none_or(|c| c == s.category))
        .collect();

    if json {
        let results: Vec<SectionJson> = sections
            .iter()
            .map(|s| section_to_json(s, nearing))
            .collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let mut first = true;
    for section in &sections {
        // With filters active, empty categories are noise
        if section.tasks.is_empty() && !criteria.is_empty() {
            continue;
        }
        if !first {
            println!();
        }
        first = false;
        println!("{}", format_section_header(section.category, section.tasks.len()));
        for &task in &section.tasks {
            println!("{}", format_task_line(task, nearing(task)));
        }
    }
    Ok(())
}

fn cmd_show(ctx: &Context, args: ShowArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let id = parse_id(&args.id)?;
    let (tracker, lock) = ctx.open()?;
    drop(lock);
    let task = tracker
        .board()
        .find_task(id)
        .ok_or_else(|| format!("task not found: {}", id))?;
    print_task(task, Utc::now(), ctx.window(), json)
}

fn cmd_progress(ctx: &Context, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (tracker, lock) = ctx.open()?;
    drop(lock);
    let progress = tracker.compute_progress();
    if json {
        println!("{}", serde_json::to_string_pretty(&progress_to_json(&progress))?);
    } else {
        println!("{}", format_progress(&progress));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(ctx: &Context, args: AddArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let priority = parse_priority_arg(&args.priority)?;
    let due_date = args.due.as_deref().map(parse_due).transpose()?;

    // Registering a category saves, so reject a bad title before that
    task_ops::normalize_title(&args.title)?;

    let (mut tracker, _lock) = ctx.open()?;
    let category = match args.category {
        Some(name) => {
            if args.new_category && tracker.add_category(&name)? {
                println!("added category {}", name.trim());
            }
            name.trim().to_string()
        }
        None => tracker
            .board()
            .categories
            .sorted_names()
            .into_iter()
            .next()
            .ok_or("no categories defined; add one with `td category add`")?,
    };

    let task = tracker.add_task(NewTask {
        title: args.title,
        description: args.description,
        due_date,
        priority,
        category,
    })?;

    if json {
        print_task(&task, Utc::now(), ctx.window(), true)?;
    } else {
        println!("{}", task.id);
    }
    Ok(())
}

fn cmd_edit(ctx: &Context, args: EditArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let id = parse_id(&args.id)?;
    let priority = args.priority.as_deref().map(parse_priority_arg).transpose()?;
    let due = args.due.as_deref().map(parse_due).transpose()?;

    let (mut tracker, _lock) = ctx.open()?;
    let mut session = tracker.begin_edit(id)?;
    if let Some(title) = args.title {
        session.set_title(title);
    }
    if args.clear_description {
        session.set_description(None);
    } else if let Some(description) = args.description {
        session.set_description(Some(description));
    }
    if args.clear_due {
        session.set_due_date(None);
    } else if let Some(due) = due {
        session.set_due_date(Some(due));
    }
    if let Some(priority) = priority {
        session.set_priority(priority);
    }

    if !session.is_dirty() {
        return Err("nothing to change (try --title, --description, --due, or --priority)".into());
    }
    let task = tracker.commit_edit(session)?;

    if json {
        print_task(&task, Utc::now(), ctx.window(), true)?;
    } else {
        println!("updated {}", task.id);
    }
    Ok(())
}

fn cmd_toggle(ctx: &Context, args: ToggleArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let id = parse_id(&args.id)?;
    let (mut tracker, _lock) = ctx.open()?;
    let task = tracker.toggle_complete(id)?;

    if json {
        print_task(&task, Utc::now(), ctx.window(), true)?;
    } else if task.completed {
        print_cheers(&mut tracker);
    } else {
        println!("reopened {} {}", task.id, task.title);
    }
    Ok(())
}

fn cmd_rm(ctx: &Context, args: RmArgs) -> Result<(), Box<dyn std::error::Error>> {
    let id = parse_id(&args.id)?;
    let (mut tracker, _lock) = ctx.open()?;
    let title = tracker
        .board()
        .find_task(id)
        .map(|t| t.title.clone())
        .ok_or_else(|| format!("task not found: {}", id))?;

    if !args.yes && !confirm(&format!("Delete \"{}\"?", title))? {
        println!("cancelled");
        return Ok(());
    }
    tracker.remove_task(id)?;
    println!("deleted {} {}", id, title);
    Ok(())
}

fn cmd_mv(ctx: &Context, args: MvArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let id = parse_id(&args.id)?;
    let (mut tracker, _lock) = ctx.open()?;
    let task = tracker.recategorize(id, &args.category)?;

    if json {
        print_task(&task, Utc::now(), ctx.window(), true)?;
    } else {
        println!("{} -> {}", task.id, task.category);
    }
    Ok(())
}

fn cmd_reorder(ctx: &Context, args: ReorderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ids = args
        .ids
        .iter()
        .map(|s| parse_id(s))
        .collect::<Result<Vec<_>, _>>()?;
    let (mut tracker, _lock) = ctx.open()?;
    tracker.reorder_within_category(&args.category, &ids)?;
    println!("reordered {} tasks in {}", ids.len(), args.category);
    Ok(())
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

fn cmd_category_list(
    ctx: &Context,
    args: CategoryListArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tracker, lock) = ctx.open()?;
    drop(lock);
    let board = tracker.board();
    let names = if args.sorted {
        board.categories.sorted_names()
    } else {
        board.categories.names().to_vec()
    };

    if json {
        let results: Vec<CategoryJson> = names
            .iter()
            .map(|name| CategoryJson {
                name: name.clone(),
                tasks: board.count_in(name),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for name in &names {
            println!("{}", format_category_line(name, board.count_in(name)));
        }
    }
    Ok(())
}

fn cmd_category_add(ctx: &Context, args: CategoryAddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (mut tracker, _lock) = ctx.open()?;
    if tracker.add_category(&args.name)? {
        println!("added category {}", args.name.trim());
    } else {
        println!("category {} already exists", args.name.trim());
    }
    Ok(())
}

fn cmd_category_rename(
    ctx: &Context,
    args: CategoryRenameArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut tracker, _lock) = ctx.open()?;
    let moved = tracker.rename_category(&args.old, &args.new)?;
    println!("renamed {} -> {}", args.old, args.new.trim());
    if moved > 0 {
        println!("  {} tasks moved", moved);
    }
    Ok(())
}

fn cmd_category_rm(ctx: &Context, args: CategoryRmArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (mut tracker, _lock) = ctx.open()?;
    // Refuse a non-empty category before asking
    let count = tracker.board().count_in(&args.name);
    if count == 0
        && tracker.board().categories.contains(&args.name)
        && !args.yes
        && !confirm(&format!("Delete category \"{}\"?", args.name))?
    {
        println!("cancelled");
        return Ok(());
    }
    tracker.remove_category(&args.name)?;
    println!("deleted category {}", args.name);
    Ok(())
}

// ---------------------------------------------------------------------------
// Preferences and background
// ---------------------------------------------------------------------------

fn cmd_theme(ctx: &Context, args: ThemeArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = DirStore::open(&ctx.data_dir)?;
    let _lock = StoreLock::acquire_default(&ctx.data_dir)?;
    let current = persist::load_dark_mode(&store)?;

    let dark_mode = match args.mode.as_deref() {
        None => current,
        Some("dark") => true,
        Some("light") => false,
        Some("toggle") => !current,
        Some(other) => {
            return Err(format!("unknown theme '{}' (expected: dark, light, toggle)", other).into());
        }
    };
    if dark_mode != current {
        persist::save_dark_mode(&mut store, dark_mode)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&ThemeJson { dark_mode })?);
    } else {
        println!("{}", if dark_mode { "dark" } else { "light" });
    }
    Ok(())
}

/// Print the tasks nearing their deadline, re-reading the store each tick so
/// changes made by other `td` commands show up.
fn cmd_watch(ctx: &Context, args: WatchArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let seconds = args
        .interval
        .unwrap_or(u64::from(ctx.config.deadline.tick_seconds))
        .max(1);
    let window = ctx.window();

    report_nearing(ctx, Utc::now(), window, json)?;
    if args.count == Some(0) {
        return Ok(());
    }

    let mut ticker = DeadlineTicker::start(std::time::Duration::from_secs(seconds))?;
    let mut ticks = 0;
    while let Some(TickEvent::Tick(now)) = ticker.wait() {
        report_nearing(ctx, now, window, json)?;
        ticks += 1;
        if args.count.is_some_and(|n| ticks >= n) {
            break;
        }
    }
    ticker.stop();
    Ok(())
}

fn report_nearing(
    ctx: &Context,
    now: DateTime<Utc>,
    window: Duration,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tracker, lock) = ctx.open()?;
    drop(lock);
    let ids = tracker.nearing_deadline(now, window);
    let tasks: Vec<&Task> = ids
        .iter()
        .filter_map(|id| tracker.board().find_task(*id))
        .collect();

    if json {
        let tick = TickJson {
            at: now.to_rfc3339(),
            nearing: tasks.iter().map(|t| task_to_json(t, true)).collect(),
        };
        println!("{}", serde_json::to_string(&tick)?);
    } else if tasks.is_empty() {
        println!("{}  nothing due soon", format_due(now));
    } else {
        println!("{}  {} due soon", format_due(now), tasks.len());
        for task in tasks {
            println!("  {}", format_task_line(task, true));
        }
    }
    Ok(())
}
