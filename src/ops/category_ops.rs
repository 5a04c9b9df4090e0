use crate::model::board::Board;

/// Error type for category operations
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CategoryError {
    #[error("invalid category: {0}")]
    Validation(String),
    #[error("category not found: {0}")]
    NotFound(String),
    #[error("category already exists: {0}")]
    Duplicate(String),
    #[error("cannot delete category {name}: it contains {count} task(s)")]
    NotEmpty { name: String, count: usize },
}

/// Register a category. Returns `false` if it was already present.
pub fn add_category(board: &mut Board, name: &str) -> Result<bool, CategoryError> {
    let name = normalize_name(name)?;
    if board.categories.contains(&name) {
        return Ok(false);
    }
    board.categories.push(name);
    Ok(true)
}

/// Rename a category in place and move every task in it to the new name.
/// Returns the number of tasks that were updated.
pub fn rename_category(board: &mut Board, old: &str, new: &str) -> Result<usize, CategoryError> {
    let index = board
        .categories
        .position(old)
        .ok_or_else(|| CategoryError::NotFound(old.to_string()))?;
    let new = normalize_name(new)?;
    if new == old {
        return Ok(0);
    }
    if board.categories.contains(&new) {
        return Err(CategoryError::Duplicate(new));
    }

    // Nothing below can fail, so registry and tasks change together
    board.categories.replace_at(index, new.clone());
    let mut moved = 0;
    for task in board.tasks.iter_mut().filter(|t| t.category == old) {
        task.category = new.clone();
        moved += 1;
    }
    Ok(moved)
}

/// Delete an empty category. Tasks are never deleted along with it.
pub fn remove_category(board: &mut Board, name: &str) -> Result<(), CategoryError> {
    let index = board
        .categories
        .position(name)
        .ok_or_else(|| CategoryError::NotFound(name.to_string()))?;
    let count = board.count_in(name);
    if count > 0 {
        return Err(CategoryError::NotEmpty {
            name: name.to_string(),
            count,
        });
    }
    board.categories.remove_at(index);
    Ok(())
}

fn normalize_name(name: &str) -> Result<String, CategoryError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(CategoryError::Validation("name cannot be empty".into()))
    } else {
        Ok(trimmed.to_string())
    }
}
