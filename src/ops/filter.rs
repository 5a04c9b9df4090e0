use std::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::board::Board;
use crate::model::task::Task;

/// Which completion states are visible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl StatusFilter {
    pub fn matches(self, completed: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => completed,
            StatusFilter::Pending => !completed,
        }
    }

    /// Parse a status filter name
    pub fn parse_status(s: &str) -> Result<StatusFilter, String> {
        match s {
            "all" => Ok(StatusFilter::All),
            "completed" | "done" => Ok(StatusFilter::Completed),
            "pending" => Ok(StatusFilter::Pending),
            _ => Err(format!(
                "unknown status '{}' (expected: all, completed, pending)",
                s
            )),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Completed => write!(f, "completed"),
            StatusFilter::Pending => write!(f, "pending"),
        }
    }
}

/// The current search/filter inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive substring of title or description; empty matches all
    pub search: String,
    pub status: StatusFilter,
    /// Local calendar day the due date must fall on
    pub date: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.status == StatusFilter::All && self.date.is_none()
    }
}

/// A category with its visible tasks, in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub category: &'a str,
    pub tasks: Vec<&'a Task>,
}

/// Whether a task passes the search, status and date filters.
/// Category is not checked here.
pub fn matches_criteria(task: &Task, criteria: &FilterCriteria) -> bool {
    if !criteria.status.matches(task.completed) {
        return false;
    }

    if !criteria.search.is_empty() {
        let needle = criteria.search.to_lowercase();
        let in_title = task.title.to_lowercase().contains(&needle);
        let in_description = task
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle));
        if !in_title && !in_description {
            return false;
        }
    }

    if let Some(day) = criteria.date {
        match task.due_date {
            Some(due) if due.with_timezone(&Local).date_naive() == day => {}
            _ => return false,
        }
    }

    true
}

/// Visible tasks of one category, sorted for display.
///
/// Pending before completed, then dated before undated, then by due date.
/// The sort is stable, so ties keep their sequence order.
pub fn compute_visible_tasks<'a>(
    tasks: &'a [Task],
    category: &str,
    criteria: &FilterCriteria,
) -> Vec<&'a Task> {
    let mut visible: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.category == category && matches_criteria(t, criteria))
        .collect();
    visible.sort_by_key(|t| (t.completed, t.due_date.is_none(), t.due_date));
    visible
}

/// Visible tasks for every category, in registry order
pub fn sections<'a>(board: &'a Board, criteria: &FilterCriteria) -> Vec<Section<'a>> {
    board
        .categories
        .names()
        .iter()
        .map(|name| Section {
            category: name.as_str(),
            tasks: compute_visible_tasks(&board.tasks, name, criteria),
        })
        .collect()
}
