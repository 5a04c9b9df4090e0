use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::io::persist::{self, PersistError};
use crate::io::store::KeyValueStore;
use crate::model::board::Board;
use crate::model::category::CategoryRegistry;
use crate::model::config::TrackerConfig;
use crate::model::task::{Task, TaskId};
use crate::ops::category_ops::{self, CategoryError};
use crate::ops::deadline;
use crate::ops::edit::EditSession;
use crate::ops::filter::{self, FilterCriteria, Section};
use crate::ops::progress::{self, Progress};
use crate::ops::seed;
use crate::ops::task_ops::{self, NewTask, TaskError, TaskPatch};

/// Something a collaborator may want to react to after a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A task went from pending to completed
    TaskCompleted { id: TaskId, title: String },
}

/// Error type for tracker commands
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    Category(#[from] CategoryError),
    /// The mutation succeeded in memory but could not be saved. The store
    /// may hold the new tasks with the old category list; see `persist::save`.
    #[error("change not saved: {0}")]
    Persist(#[from] PersistError),
}

/// Owns the board and its store.
///
/// Every command validates and mutates through `ops`, then saves. A failed
/// save leaves the in-memory change in place and is returned as
/// `TrackerError::Persist`, so the caller can report it and retry `save`.
pub struct Tracker<S: KeyValueStore> {
    board: Board,
    store: S,
    notifications: Vec<Notification>,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Wrap an existing board without touching the store
    pub fn new(board: Board, store: S) -> Self {
        Tracker {
            board,
            store,
            notifications: Vec::new(),
        }
    }

    /// Load from the store, seeding (and saving) a fresh board when it is empty
    pub fn open(store: S, config: &TrackerConfig) -> Result<Self, PersistError> {
        let defaults = default_categories(config);
        let seed_examples = config.seed.examples;
        let (mut board, mut fresh) = persist::load_or_init(&store, &defaults, || {
            if seed_examples {
                seed::seeded_board_now(defaults.clone())
            } else {
                Board::new(defaults.clone())
            }
        })?;
        if board.categories.is_empty() {
            warn!("stored category list is empty; restoring defaults");
            board.categories = defaults.clone();
            fresh = true;
        }

        let mut tracker = Tracker::new(board, store);
        if fresh {
            info!(
                tasks = tracker.board.tasks.len(),
                "initialized a new task board"
            );
            tracker.save()?;
        }
        Ok(tracker)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_parts(self) -> (Board, S) {
        (self.board, self.store)
    }

    pub fn save(&mut self) -> Result<(), PersistError> {
        persist::save(&mut self.store, &self.board)
    }

    fn persist(&mut self) -> Result<(), TrackerError> {
        if let Err(e) = self.save() {
            warn!(error = %e, "could not save board");
            return Err(e.into());
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    pub fn add_task(&mut self, new: NewTask) -> Result<Task, TrackerError> {
        self.add_task_at(new, Utc::now())
    }

    /// Add with an explicit creation time (used for id allocation)
    pub fn add_task_at(&mut self, new: NewTask, now: DateTime<Utc>) -> Result<Task, TrackerError> {
        let task = task_ops::add_task(&mut self.board, new, now)?;
        debug!(id = %task.id, category = %task.category, "added task");
        self.persist()?;
        Ok(task)
    }

    pub fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<Task, TrackerError> {
        let task = task_ops::update_task(&mut self.board, id, patch)?;
        debug!(id = %id, "updated task");
        self.persist()?;
        Ok(task)
    }

    /// Start an edit workflow on a task
    pub fn begin_edit(&self, id: TaskId) -> Result<EditSession, TrackerError> {
        Ok(EditSession::begin(&self.board, id)?)
    }

    pub fn commit_edit(&mut self, session: EditSession) -> Result<Task, TrackerError> {
        if !session.is_dirty() {
            return Ok(session.original().clone());
        }
        let id = session.task_id();
        let task = session.commit(&mut self.board)?;
        debug!(id = %id, "committed edit");
        self.persist()?;
        Ok(task)
    }

    pub fn toggle_complete(&mut self, id: TaskId) -> Result<Task, TrackerError> {
        let task = task_ops::toggle_complete(&mut self.board, id)?;
        debug!(id = %id, completed = task.completed, "toggled task");
        if task.completed {
            self.notifications.push(Notification::TaskCompleted {
                id,
                title: task.title.clone(),
            });
        }
        self.persist()?;
        Ok(task)
    }

    /// Delete a task. The caller obtains confirmation first.
    pub fn remove_task(&mut self, id: TaskId) -> Result<Task, TrackerError> {
        let task = task_ops::remove_task(&mut self.board, id)?;
        debug!(id = %id, "removed task");
        self.persist()?;
        Ok(task)
    }

    pub fn reorder_within_category(
        &mut self,
        category: &str,
        ordered: &[TaskId],
    ) -> Result<(), TrackerError> {
        task_ops::reorder_within_category(&mut self.board, category, ordered)?;
        debug!(category, "reordered category");
        self.persist()
    }

    pub fn recategorize(&mut self, id: TaskId, category: &str) -> Result<Task, TrackerError> {
        let task = task_ops::recategorize(&mut self.board, id, category)?;
        debug!(id = %id, category, "recategorized task");
        self.persist()?;
        Ok(task)
    }

    // -----------------------------------------------------------------------
    // Categories
    // -----------------------------------------------------------------------

    /// Register a category; `false` if it already existed
    pub fn add_category(&mut self, name: &str) -> Result<bool, TrackerError> {
        let added = category_ops::add_category(&mut self.board, name)?;
        if added {
            debug!(name = name.trim(), "added category");
            self.persist()?;
        }
        Ok(added)
    }

    /// Rename a category; returns how many tasks moved with it
    pub fn rename_category(&mut self, old: &str, new: &str) -> Result<usize, TrackerError> {
        let moved = category_ops::rename_category(&mut self.board, old, new)?;
        debug!(old, new = new.trim(), moved, "renamed category");
        self.persist()?;
        Ok(moved)
    }

    /// Delete an empty category. The caller obtains confirmation first.
    pub fn remove_category(&mut self, name: &str) -> Result<(), TrackerError> {
        category_ops::remove_category(&mut self.board, name)?;
        debug!(name, "removed category");
        self.persist()
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn compute_visible_tasks(&self, category: &str, criteria: &FilterCriteria) -> Vec<&Task> {
        filter::compute_visible_tasks(&self.board.tasks, category, criteria)
    }

    pub fn sections(&self, criteria: &FilterCriteria) -> Vec<Section<'_>> {
        filter::sections(&self.board, criteria)
    }

    pub fn compute_progress(&self) -> Progress {
        progress::compute_progress(&self.board.tasks)
    }

    pub fn nearing_deadline(&self, now: DateTime<Utc>, window: Duration) -> Vec<TaskId> {
        deadline::nearing_deadline(&self.board.tasks, now, window)
    }

    /// Take the notifications raised since the last call
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

/// Configured default categories, or the built-in set when the configured
/// list has no usable names
fn default_categories(config: &TrackerConfig) -> CategoryRegistry {
    let configured = CategoryRegistry::from_names(&config.categories.defaults);
    if configured.is_empty() {
        warn!("config lists no default categories; using the built-in set");
        return CategoryRegistry::defaults();
    }
    configured
}
