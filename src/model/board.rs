use super::category::CategoryRegistry;
use super::task::{Task, TaskId};

/// The full tracker state: the global task sequence plus the category registry.
///
/// A task's position in `tasks` is its order; the order within a category is
/// the order of that category's tasks in the global sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    pub tasks: Vec<Task>,
    pub categories: CategoryRegistry,
}

impl Board {
    /// An empty board with the given registry
    pub fn new(categories: CategoryRegistry) -> Self {
        Board {
            tasks: Vec::new(),
            categories,
        }
    }

    pub fn find_task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn find_task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn task_index(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Tasks of one category, in sequence order
    pub fn tasks_in<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks.iter().filter(move |t| t.category == category)
    }

    pub fn count_in(&self, category: &str) -> usize {
        self.tasks_in(category).count()
    }

    /// Largest id currently in use, if any
    pub fn max_id(&self) -> Option<TaskId> {
        self.tasks.iter().map(|t| t.id).max()
    }

    /// Category names referenced by tasks but missing from the registry
    pub fn orphaned_categories(&self) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for task in &self.tasks {
            if !self.categories.contains(&task.category) && !missing.contains(&task.category) {
                missing.push(task.category.clone());
            }
        }
        missing
    }
}
