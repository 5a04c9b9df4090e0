use tracing::{debug, warn};

use crate::io::store::{KeyValueStore, StoreError};
use crate::model::board::Board;
use crate::model::category::CategoryRegistry;
use crate::model::task::Task;

/// Slot holding the task sequence
pub const TASKS_KEY: &str = "tasks";
/// Slot holding the category registry
pub const CATEGORIES_KEY: &str = "categories";
/// Slot holding the dark mode preference
pub const DARK_MODE_KEY: &str = "darkMode";

/// Error type for loading and saving tracker state
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("stored {key} is malformed: {source}")]
    Corrupt {
        key: &'static str,
        source: serde_json::Error,
    },
    #[error("could not serialize {key}: {source}")]
    Serialize {
        key: &'static str,
        source: serde_json::Error,
    },
}

/// Write tasks and categories to their slots.
///
/// The two slots are separate writes. If the categories write fails after
/// the tasks write landed (say mid-rename), the store holds new task
/// categories with the old registry; `load` then registers the missing names,
/// so the old and new names both appear until the next successful save.
pub fn save<S: KeyValueStore + ?Sized>(store: &mut S, board: &Board) -> Result<(), PersistError> {
    let tasks = serde_json::to_string(&board.tasks).map_err(|e| PersistError::Serialize {
        key: TASKS_KEY,
        source: e,
    })?;
    let categories =
        serde_json::to_string(&board.categories).map_err(|e| PersistError::Serialize {
            key: CATEGORIES_KEY,
            source: e,
        })?;
    store.set(TASKS_KEY, &tasks)?;
    store.set(CATEGORIES_KEY, &categories)?;
    debug!(
        tasks = board.tasks.len(),
        categories = board.categories.len(),
        "saved board"
    );
    Ok(())
}

/// Read tasks and categories back.
///
/// Returns `None` when neither slot exists. A missing categories slot falls
/// back to `defaults`; categories referenced by tasks but absent from the
/// registry are appended so every task points at a registered category.
pub fn load<S: KeyValueStore + ?Sized>(
    store: &S,
    defaults: &CategoryRegistry,
) -> Result<Option<Board>, PersistError> {
    let tasks_raw = store.get(TASKS_KEY)?;
    let categories_raw = store.get(CATEGORIES_KEY)?;
    if tasks_raw.is_none() && categories_raw.is_none() {
        return Ok(None);
    }

    let tasks: Vec<Task> = match tasks_raw {
        Some(raw) => serde_json::from_str(&raw).map_err(|e| PersistError::Corrupt {
            key: TASKS_KEY,
            source: e,
        })?,
        None => Vec::new(),
    };
    let categories = match categories_raw {
        Some(raw) => {
            let names: Vec<String> =
                serde_json::from_str(&raw).map_err(|e| PersistError::Corrupt {
                    key: CATEGORIES_KEY,
                    source: e,
                })?;
            CategoryRegistry::from_names(names)
        }
        None => defaults.clone(),
    };

    let mut board = Board { tasks, categories };
    for name in board.orphaned_categories() {
        warn!(category = %name, "task references an unregistered category; registering it");
        board.categories.push(name);
    }
    Ok(Some(board))
}

/// Load the stored board, or build a fresh one when the store is empty.
/// The flag is `true` when the board was freshly built.
pub fn load_or_init<S, F>(
    store: &S,
    defaults: &CategoryRegistry,
    init: F,
) -> Result<(Board, bool), PersistError>
where
    S: KeyValueStore + ?Sized,
    F: FnOnce() -> Board,
{
    match load(store, defaults)? {
        Some(board) => Ok((board, false)),
        None => {
            debug!("store is empty; initializing board");
            Ok((init(), true))
        }
    }
}

/// Dark mode preference; missing or unreadable means off
pub fn load_dark_mode<S: KeyValueStore + ?Sized>(store: &S) -> Result<bool, PersistError> {
    let Some(raw) = store.get(DARK_MODE_KEY)? else {
        return Ok(false);
    };
    match serde_json::from_str::<bool>(raw.trim()) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!(error = %e, "ignoring malformed dark mode preference");
            Ok(false)
        }
    }
}

pub fn save_dark_mode<S: KeyValueStore + ?Sized>(
    store: &mut S,
    enabled: bool,
) -> Result<(), PersistError> {
    store.set(DARK_MODE_KEY, if enabled { "true" } else { "false" })?;
    Ok(())
}
