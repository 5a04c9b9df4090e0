use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::model::board::Board;
use crate::model::task::{Priority, Task, TaskId};

/// Error type for task operations
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("invalid task: {0}")]
    Validation(String),
    #[error("task not found: {0}")]
    NotFound(TaskId),
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

/// Fields for a task about to be created
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub category: String,
}

impl NewTask {
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        NewTask {
            title: title.into(),
            category: category.into(),
            ..Default::default()
        }
    }
}

/// A partial update. `None` leaves a field alone; for the optional fields
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub priority: Option<Priority>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
    }
}

// ---------------------------------------------------------------------------
// Create / update / delete
// ---------------------------------------------------------------------------

/// Add a task at the end of the global sequence.
/// Returns a copy of the stored task.
pub fn add_task(board: &mut Board, new: NewTask, now: DateTime<Utc>) -> Result<Task, TaskError> {
    let title = normalize_title(&new.title)?;
    require_category(board, &new.category)?;

    let mut task = Task::new(next_id(board, now)?, title, new.category);
    task.description = new.description.as_deref().and_then(normalize_text);
    task.due_date = new.due_date;
    task.priority = new.priority;

    board.tasks.push(task.clone());
    Ok(task)
}

/// Apply a partial update to title, description, due date and priority.
pub fn update_task(board: &mut Board, id: TaskId, patch: &TaskPatch) -> Result<Task, TaskError> {
    // Validate before touching anything
    let title = patch.title.as_deref().map(normalize_title).transpose()?;
    let task = board.find_task_mut(id).ok_or(TaskError::NotFound(id))?;

    if let Some(title) = title {
        task.title = title;
    }
    if let Some(description) = &patch.description {
        task.description = description.as_deref().and_then(normalize_text);
    }
    if let Some(due) = patch.due_date {
        task.due_date = due;
    }
    if let Some(priority) = patch.priority {
        task.priority = priority;
    }
    Ok(task.clone())
}

/// Flip the completed flag
pub fn toggle_complete(board: &mut Board, id: TaskId) -> Result<Task, TaskError> {
    let task = board.find_task_mut(id).ok_or(TaskError::NotFound(id))?;
    task.completed = !task.completed;
    Ok(task.clone())
}

/// Delete a task. Confirmation is the caller's business.
pub fn remove_task(board: &mut Board, id: TaskId) -> Result<Task, TaskError> {
    let idx = board.task_index(id).ok_or(TaskError::NotFound(id))?;
    Ok(board.tasks.remove(idx))
}

// ---------------------------------------------------------------------------
// Ordering and categories
// ---------------------------------------------------------------------------

/// Replace the relative order of a category's tasks.
///
/// `ordered` must name every current member exactly once. The category's
/// tasks keep the global slots they occupied; only their assignment to those
/// slots changes, so other categories do not move.
pub fn reorder_within_category(
    board: &mut Board,
    category: &str,
    ordered: &[TaskId],
) -> Result<(), TaskError> {
    require_category(board, category)?;

    let slots: Vec<usize> = board
        .tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.category == category)
        .map(|(i, _)| i)
        .collect();

    if ordered.len() != slots.len() {
        return Err(TaskError::Validation(format!(
            "category {} has {} tasks but {} ids were given",
            category,
            slots.len(),
            ordered.len()
        )));
    }

    let mut members: HashMap<TaskId, Task> = slots
        .iter()
        .map(|&i| (board.tasks[i].id, board.tasks[i].clone()))
        .collect();

    let mut seen = HashSet::new();
    for id in ordered {
        if !seen.insert(*id) {
            return Err(TaskError::Validation(format!("task {} listed twice", id)));
        }
        if !members.contains_key(id) {
            return Err(TaskError::Validation(format!(
                "task {} is not in category {}",
                id, category
            )));
        }
    }

    for (slot, id) in slots.iter().zip(ordered) {
        if let Some(task) = members.remove(id) {
            board.tasks[*slot] = task;
        }
    }
    Ok(())
}

/// Move a task to another category. It lands last in the new category.
pub fn recategorize(board: &mut Board, id: TaskId, new_category: &str) -> Result<Task, TaskError> {
    require_category(board, new_category)?;
    let idx = board.task_index(id).ok_or(TaskError::NotFound(id))?;

    if board.tasks[idx].category == new_category {
        return Ok(board.tasks[idx].clone());
    }

    let mut task = board.tasks.remove(idx);
    task.category = new_category.to_string();
    board.tasks.push(task.clone());
    Ok(task)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Allocate an id: the creation timestamp in milliseconds, bumped past the
/// largest id in use so ids stay unique and increasing. Fails once the id
/// space above the largest stored id is used up.
pub fn next_id(board: &Board, now: DateTime<Utc>) -> Result<TaskId, TaskError> {
    let stamp = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    match board.max_id() {
        Some(TaskId(max)) if max >= stamp => max
            .checked_add(1)
            .map(TaskId)
            .ok_or_else(|| TaskError::Validation(format!("no task id left after {}", max))),
        _ => Ok(TaskId(stamp)),
    }
}

fn require_category(board: &Board, name: &str) -> Result<(), TaskError> {
    if board.categories.contains(name) {
        Ok(())
    } else {
        Err(TaskError::UnknownCategory(name.to_string()))
    }
}

/// Trim a title, rejecting one that is empty afterwards
pub fn normalize_title(title: &str) -> Result<String, TaskError> {
    normalize_text(title).ok_or_else(|| TaskError::Validation("title cannot be empty".into()))
}

fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
