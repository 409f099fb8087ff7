//! Deterministic, pure logic shared by planning and execution.
//!
//! Core modules must be free of I/O side effects.

pub mod invocation;
pub mod types;
pub mod validate;
