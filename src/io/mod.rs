pub mod config_io;
pub mod lock;
pub mod persist;
pub mod store;
pub mod ticker;
