use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone, Utc};

use crate::model::board::Board;
use crate::model::category::CategoryRegistry;
use crate::model::task::{Priority, Task, TaskId};

/// The board a fresh install starts with: the given registry plus the
/// sample tasks, with due dates placed relative to `now`.
///
/// Samples whose category is not in `categories` are left out.
pub fn seeded_board<Tz: TimeZone>(now: DateTime<Tz>, categories: CategoryRegistry) -> Board {
    let mut board = Board::new(categories);
    board.tasks = sample_tasks(now)
        .into_iter()
        .filter(|t| board.categories.contains(&t.category))
        .collect();
    board
}

/// The six sample tasks
pub fn sample_tasks<Tz: TimeZone>(now: DateTime<Tz>) -> Vec<Task> {
    let today_at = |h: u32, m: u32| -> Option<DateTime<Utc>> {
        let time = NaiveTime::from_hms_opt(h, m, 0)?;
        now.timezone()
            .from_local_datetime(&now.date_naive().and_time(time))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    };
    let now_utc = now.with_timezone(&Utc);

    let mut tasks = vec![
        Task::new(TaskId(1), "Complete To-Do App Refinement", "Work")
            .with_description("Ensure all features are working and styling is polished.")
            .with_priority(Priority::High),
        Task::new(TaskId(2), "Buy Groceries", "Shopping")
            .with_description("Milk, Eggs, Bread, Fruits, Vegetables.")
            .with_priority(Priority::Medium),
        Task::new(TaskId(3), "Go for a run", "Health")
            .with_description("Morning 30-minute jog in the park.")
            .with_due_date(now_utc + Duration::days(1)),
        Task::new(TaskId(4), "Read \"The Great Gatsby\"", "Personal")
            .with_description("Finish Chapter 3.")
            .with_due_date(now_utc + Duration::days(2)),
        Task::new(TaskId(5), "Send Project Report", "Work")
            .with_description("Final review and submission to client.")
            .with_priority(Priority::High)
            .with_completed(true),
        Task::new(TaskId(6), "Call Mom", "Personal")
            .with_description("Catch up on family news.")
            .with_due_date(now_utc - Duration::days(1))
            .with_priority(Priority::Medium)
            .with_completed(true),
    ];
    tasks[0].due_date = today_at(23, 59);
    tasks[4].due_date = today_at(17, 0);
    tasks
}

/// Seed relative to the local clock
pub fn seeded_board_now(categories: CategoryRegistry) -> Board {
    seeded_board(Local::now(), categories)
}
