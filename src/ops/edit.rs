use chrono::{DateTime, Utc};

use crate::model::board::Board;
use crate::model::task::{Priority, Task, TaskId};
use crate::ops::task_ops::{self, TaskError, TaskPatch};

/// One edit workflow on one task.
///
/// Holds a snapshot of the task as it was when editing started and the
/// pending changes. Nothing is written to the board until `commit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    original: Task,
    patch: TaskPatch,
}

impl EditSession {
    pub fn begin(board: &Board, id: TaskId) -> Result<Self, TaskError> {
        let original = board.find_task(id).ok_or(TaskError::NotFound(id))?.clone();
        Ok(EditSession {
            original,
            patch: TaskPatch::default(),
        })
    }

    pub fn task_id(&self) -> TaskId {
        self.original.id
    }

    /// The task as it was when the session began
    pub fn original(&self) -> &Task {
        &self.original
    }

    pub fn patch(&self) -> &TaskPatch {
        &self.patch
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.patch.title = Some(title.into());
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.patch.description = Some(description);
    }

    pub fn set_due_date(&mut self, due: Option<DateTime<Utc>>) {
        self.patch.due_date = Some(due);
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.patch.priority = Some(priority);
    }

    /// The task with pending changes applied (unvalidated)
    pub fn preview(&self) -> Task {
        let mut task = self.original.clone();
        if let Some(title) = &self.patch.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = &self.patch.description {
            task.description = description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string);
        }
        if let Some(due) = self.patch.due_date {
            task.due_date = due;
        }
        if let Some(priority) = self.patch.priority {
            task.priority = priority;
        }
        task
    }

    /// Whether committing would change anything
    pub fn is_dirty(&self) -> bool {
        self.preview() != self.original
    }

    /// Apply the pending changes to the board
    pub fn commit(self, board: &mut Board) -> Result<Task, TaskError> {
        task_ops::update_task(board, self.original.id, &self.patch)
    }
}
