use chrono::{DateTime, Duration, Utc};

use crate::model::task::{Task, TaskId};

/// Default highlight window: two hours
pub fn default_window() -> Duration {
    Duration::hours(2)
}

/// A pending task whose due date falls in `(now, now + window]`.
/// This is derived from the clock and never stored.
pub fn is_nearing_deadline(task: &Task, now: DateTime<Utc>, window: Duration) -> bool {
    if task.completed {
        return false;
    }
    match task.due_date {
        Some(due) => now < due && due <= now + window,
        None => false,
    }
}

/// Ids of every task currently nearing its deadline, in sequence order
pub fn nearing_deadline(tasks: &[Task], now: DateTime<Utc>, window: Duration) -> Vec<TaskId> {
    tasks
        .iter()
        .filter(|t| is_nearing_deadline(t, now, window))
        .map(|t| t.id)
        .collect()
}
