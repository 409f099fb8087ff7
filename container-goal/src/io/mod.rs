//! I/O helpers for planning and execution.

pub mod config;
pub mod process;
pub mod progress_log;
pub mod runtime;
pub mod spec_loader;
pub mod token;
