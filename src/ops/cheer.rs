use crate::model::task::TaskId;

/// Messages shown when a task is completed
pub const MESSAGES: [&str; 8] = [
    "You're making great progress!",
    "Awesome job! Keep going!",
    "Every step counts. Well done!",
    "Productivity pro in the making!",
    "Another task conquered. Fantastic!",
    "You're unstoppable!",
    "Success is the sum of small efforts repeated daily.",
    "The best way to get started is to quit talking and begin doing.",
];

/// Pick a message for a completed task. Ids are timestamps, so this rotates
/// well enough without a random source.
pub fn message_for(id: TaskId) -> &'static str {
    MESSAGES[(id.0 % MESSAGES.len() as u64) as usize]
}
