//! taskdeck: a personal task tracker.
//!
//! The library is the data-model core (`model`, `ops`), persistence and
//! timers (`io`), and the [`tracker::Tracker`] that ties them together. The
//! `td` binary in `cli` is a thin adapter over it.

pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod tracker;
pub mod util;
