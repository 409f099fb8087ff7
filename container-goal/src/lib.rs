//! Dynamic container goals planned from an in-repository goal file.
//!
//! A project declares container tasks in `goals.json`, `goals.yaml` or
//! `goals.yml`. Planning turns each declared task into one scheduling-ready
//! unit for a host scheduler; execution runs one unit as a disposable
//! container through an external runtime CLI and reports a structured result.
//!
//! - **[`core`]**: Pure logic (data model, validation, runtime argv).
//! - **[`io`]**: Side effects (goal file discovery, processes, progress logs).
//!
//! [`plan`] and [`execute`] are the two host-facing operations.

pub mod core;
pub mod error;
pub mod execute;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod plan;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
