//! Stable exit codes for `container-goal` CLI commands.

/// Command succeeded (or the container run succeeded).
pub const OK: i32 = 0;
/// `container-goal execute` ran the container and it failed.
pub const GOAL_FAILED: i32 = 1;
/// Invalid goal file, config or arguments.
pub const INVALID: i32 = 2;
