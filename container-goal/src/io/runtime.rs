//! Container runtime abstraction.
//!
//! The [`ContainerRuntime`] trait decouples goal execution from the actual
//! runtime binary (`docker` by default). Tests use scripted runtimes that
//! record the argv they were given without spawning processes.

use std::process::Command;

use anyhow::Result;
use tracing::{info, instrument, warn};

use crate::io::process::run_streaming;
use crate::io::progress_log::ProgressLog;

/// How a runtime invocation ended, once the process was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeExit {
    Success,
    /// Non-zero exit. `code` is `None` when the process was killed by a signal.
    Failed { code: Option<i32> },
}

/// Abstraction over container runtime backends.
pub trait ContainerRuntime {
    /// Run the runtime with `args`, streaming its output into `log`.
    ///
    /// `Err` means the runtime could not be launched at all.
    fn run(&self, args: &[String], log: &dyn ProgressLog) -> Result<RuntimeExit>;
}

/// Runtime that spawns a container CLI (`docker`, `podman`, ...) as a subprocess.
#[derive(Debug, Clone)]
pub struct CliRuntime {
    program: String,
}

impl CliRuntime {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ContainerRuntime for CliRuntime {
    #[instrument(skip_all, fields(program = %self.program))]
    fn run(&self, args: &[String], log: &dyn ProgressLog) -> Result<RuntimeExit> {
        info!(args = ?args, "invoking container runtime");
        let mut cmd = Command::new(&self.program);
        cmd.args(args);

        let status = run_streaming(cmd, log)?;
        if status.success() {
            Ok(RuntimeExit::Success)
        } else {
            warn!(exit_code = ?status.code(), "container runtime failed");
            Ok(RuntimeExit::Failed {
                code: status.code(),
            })
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::io::progress_log::MemoryLog;

    #[test]
    fn passes_each_argument_as_its_own_token() {
        let runtime = CliRuntime::new("printf");
        let log = MemoryLog::new();
        let args = vec!["%s|".to_string(), "a b".to_string(), "$HOME".to_string()];
        let exit = runtime.run(&args, &log).expect("run");
        assert_eq!(exit, RuntimeExit::Success);
        assert_eq!(log.contents(), "a b|$HOME|");
    }

    #[test]
    fn maps_failure_exit_code() {
        let runtime = CliRuntime::new("false");
        let log = MemoryLog::new();
        let exit = runtime.run(&[], &log).expect("run");
        assert_eq!(exit, RuntimeExit::Failed { code: Some(1) });
    }

    #[test]
    fn missing_program_is_a_launch_error() {
        let runtime = CliRuntime::new("/nonexistent/container-runtime");
        let log = MemoryLog::new();
        assert!(runtime.run(&[], &log).is_err());
    }
}
