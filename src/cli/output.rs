use serde::Serialize;

use crate::model::task::{Priority, Task};
use crate::ops::filter::Section;
use crate::ops::progress::Progress;
use crate::util::dates::format_due;
use crate::util::unicode::{fit_to_width, truncate_to_width};

/// Widest a title gets in a one-line listing
pub const TITLE_WIDTH: usize = 48;

/// Category column width in `category list`
const CATEGORY_WIDTH: usize = 20;

/// Cells in the progress bar
const BAR_WIDTH: usize = 20;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskJson {
    pub id: u64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: Priority,
    pub category: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub nearing_deadline: bool,
}

#[derive(Serialize)]
pub struct SectionJson {
    pub category: String,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct ProgressJson {
    pub completed: usize,
    pub total: usize,
    pub percent: u32,
}

#[derive(Serialize)]
pub struct CategoryJson {
    pub name: String,
    pub tasks: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeJson {
    pub dark_mode: bool,
}

#[derive(Serialize)]
pub struct TickJson {
    pub at: String,
    pub nearing: Vec<TaskJson>,
}

pub fn task_to_json(task: &Task, nearing: bool) -> TaskJson {
    TaskJson {
        id: task.id.0,
        title: task.title.clone(),
        description: task.description.clone(),
        due_date: task.due_date.map(|d| d.to_rfc3339()),
        priority: task.priority,
        category: task.category.clone(),
        completed: task.completed,
        nearing_deadline: nearing,
    }
}

/// `nearing` decides the per-task highlight flag
pub fn section_to_json(section: &Section<'_>, nearing: impl Fn(&Task) -> bool) -> SectionJson {
    SectionJson {
        category: section.category.to_string(),
        tasks: section
            .tasks
            .iter()
            .map(|&t| task_to_json(t, nearing(t)))
            .collect(),
    }
}

pub fn progress_to_json(progress: &Progress) -> ProgressJson {
    ProgressJson {
        completed: progress.completed,
        total: progress.total,
        percent: progress.percent(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn checkbox(task: &Task) -> char {
    if task.completed { 'x' } else { ' ' }
}

/// Format a single task as a one-line summary
pub fn format_task_line(task: &Task, nearing: bool) -> String {
    let mut line = format!(
        "[{}] {} {}",
        checkbox(task),
        task.id,
        truncate_to_width(&task.title, TITLE_WIDTH)
    );
    if task.priority != Priority::Low {
        line.push_str(&format!(" !{}", task.priority));
    }
    if let Some(due) = task.due_date {
        line.push_str(&format!(" (due {})", format_due(due)));
    }
    if nearing {
        line.push_str(" <- due soon");
    }
    line
}

/// Format detailed task view
pub fn format_task_detail(task: &Task, nearing: bool) -> Vec<String> {
    let mut lines = vec![format!("[{}] {} {}", checkbox(task), task.id, task.title)];
    lines.push(format!("category: {}", task.category));
    lines.push(format!("priority: {}", task.priority));
    if let Some(due) = task.due_date {
        let soon = if nearing { " (due soon)" } else { "" };
        lines.push(format!("due: {}{}", format_due(due), soon));
    }
    if let Some(description) = &task.description {
        lines.push("description:".to_string());
        for line in description.lines() {
            lines.push(format!("  {}", line));
        }
    }
    lines
}

/// Format a category section header
pub fn format_section_header(category: &str, count: usize) -> String {
    format!("== {} ({}) ==", category, count)
}

/// One row of `category list`
pub fn format_category_line(name: &str, count: usize) -> String {
    let noun = if count == 1 { "task" } else { "tasks" };
    format!("{} {} {}", fit_to_width(name, CATEGORY_WIDTH), count, noun)
}

/// Progress bar plus counts, e.g. `[##########..........] 3/6 (50%)`
pub fn format_progress(progress: &Progress) -> String {
    let filled = ((progress.fraction() * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!(
        "[{}{}] {}/{} ({}%)",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        progress.completed,
        progress.total,
        progress.percent()
    )
}
