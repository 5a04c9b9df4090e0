use serde::Serialize;

use crate::model::task::Task;

/// Completion counts across all tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Completed over total; zero when there are no tasks
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    /// Rounded percentage, 0..=100
    pub fn percent(&self) -> u32 {
        (self.fraction() * 100.0).round() as u32
    }
}

pub fn compute_progress(tasks: &[Task]) -> Progress {
    Progress {
        completed: tasks.iter().filter(|t| t.completed).count(),
        total: tasks.len(),
    }
}
