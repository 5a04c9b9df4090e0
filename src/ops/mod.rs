pub mod category_ops;
pub mod cheer;
pub mod deadline;
pub mod edit;
pub mod filter;
pub mod progress;
pub mod seed;
pub mod task_ops;
