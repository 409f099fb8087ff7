//! Execution of a single planned unit.
//!
//! A failed container run is a normal outcome here: it is written to the
//! progress log and returned as [`ExecutionResult::failure`], never as an
//! error. Retries are left to the host scheduler.

use anyhow::Result;
use tracing::{debug, info, instrument, warn};

use crate::core::invocation::{container_name, runtime_args};
use crate::core::types::{ExecParams, ExecutionResult};
use crate::io::config::GoalConfig;
use crate::io::progress_log::{ProgressLog, write_line};
use crate::io::runtime::{CliRuntime, ContainerRuntime, RuntimeExit};
use crate::io::token::{TokenSource, UuidTokens};

/// Host-supplied context for one execution.
pub struct Invocation<'a> {
    /// Repository identifier (at minimum its name).
    pub repo: &'a str,
    /// Parameters captured at planning time.
    pub parameters: &'a ExecParams,
    /// Sink for container output and status lines.
    pub log: &'a dyn ProgressLog,
}

/// The dynamic container goal: runs planned units through a container runtime.
pub struct ContainerGoal<R, T> {
    name: String,
    display_name: String,
    runtime: R,
    tokens: T,
}

impl ContainerGoal<CliRuntime, UuidTokens> {
    /// Goal backed by the configured runtime CLI and UUID tokens.
    pub fn from_config(cfg: &GoalConfig) -> Self {
        Self::new(cfg, CliRuntime::new(cfg.runtime.clone()), UuidTokens)
    }
}

impl<R: ContainerRuntime, T: TokenSource> ContainerGoal<R, T> {
    pub fn new(cfg: &GoalConfig, runtime: R, tokens: T) -> Self {
        Self {
            name: cfg.goal_name.clone(),
            display_name: cfg.goal_display_name.clone(),
            runtime,
            tokens,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Goal handler entry point: records the unit parameters in the progress
    /// log, then executes the unit.
    pub fn run_goal(&self, invocation: &Invocation<'_>) -> ExecutionResult {
        let details = serde_json::to_string(invocation.parameters)
            .unwrap_or_else(|err| format!("<unserializable parameters: {err}>"));
        info!(goal = %self.display_name, repo = %invocation.repo, "running goal");
        write_line(invocation.log, &format!("New goal, details => {details}"));
        self.execute(invocation)
    }

    /// Run one container to completion and map its exit to a result.
    ///
    /// Every call uses a freshly generated container name, so concurrent calls
    /// for the same image and repository never share a container.
    #[instrument(
        skip_all,
        fields(goal = %self.name, repo = %invocation.repo, image = %invocation.parameters.image)
    )]
    pub fn execute(&self, invocation: &Invocation<'_>) -> ExecutionResult {
        let params = invocation.parameters;
        let name = container_name(invocation.repo, &params.image, &self.tokens.fresh_token());
        let args = runtime_args(&name, params);
        debug!(container = %name, "launching container");

        let failure = match self.runtime.run(&args, invocation.log) {
            Ok(RuntimeExit::Success) => {
                info!(container = %name, "container succeeded");
                return ExecutionResult::success();
            }
            Ok(RuntimeExit::Failed { code: Some(code) }) => {
                format!("container exited with code {code}")
            }
            Ok(RuntimeExit::Failed { code: None }) => {
                "container was terminated by a signal".to_string()
            }
            Err(err) => format!("{err:#}"),
        };

        warn!(container = %name, error = %failure, "container failed");
        write_line(invocation.log, &format!("Container '{name}' failed: {failure}"));
        ExecutionResult::failure(Some(failure))
    }
}

/// Build a goal from `cfg` and execute one unit with it.
pub fn execute(cfg: &GoalConfig, invocation: &Invocation<'_>) -> Result<ExecutionResult> {
    cfg.validate()?;
    Ok(ContainerGoal::from_config(cfg).execute(invocation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CODE_FAILURE;
    use crate::io::progress_log::MemoryLog;
    use crate::test_support::{ScriptedRuntime, SequentialTokens, ubuntu_date_params};

    fn goal(runtime: ScriptedRuntime) -> ContainerGoal<ScriptedRuntime, SequentialTokens> {
        ContainerGoal::new(&GoalConfig::default(), runtime, SequentialTokens::new("tok"))
    }

    #[test]
    fn default_registration_names() {
        let goal = goal(ScriptedRuntime::default());
        assert_eq!(goal.name(), "dyn-container-goal");
        assert_eq!(goal.display_name(), "Dynamic Container Goal");
    }

    #[test]
    fn successful_run_has_no_message() {
        let goal = goal(ScriptedRuntime::new(vec![Ok(RuntimeExit::Success)]));
        let log = MemoryLog::new();
        let params = ubuntu_date_params();
        let result = goal.execute(&Invocation {
            repo: "repo",
            parameters: &params,
            log: &log,
        });

        assert_eq!(result, ExecutionResult::success());
        assert_eq!(result.message(), None);
        assert!(log.contents().is_empty());
    }

    #[test]
    fn invokes_runtime_with_run_contract() {
        let runtime = ScriptedRuntime::new(vec![Ok(RuntimeExit::Success)]);
        let goal = goal(runtime.clone());
        let log = MemoryLog::new();
        let params = ubuntu_date_params();
        goal.execute(&Invocation {
            repo: "repo",
            parameters: &params,
            log: &log,
        });

        let calls = runtime.calls();
        assert_eq!(
            calls,
            vec![vec![
                "run".to_string(),
                "--tty".to_string(),
                "--rm".to_string(),
                "--name=repo-ubuntu-tok-0".to_string(),
                "ubuntu:18.04".to_string(),
                "date".to_string(),
                "+%s".to_string(),
            ]]
        );
    }

    #[test]
    fn non_zero_exit_is_a_failure_result() {
        let goal = goal(ScriptedRuntime::new(vec![Ok(RuntimeExit::Failed {
            code: Some(125),
        })]));
        let log = MemoryLog::new();
        let params = ubuntu_date_params();
        let result = goal.execute(&Invocation {
            repo: "repo",
            parameters: &params,
            log: &log,
        });

        assert_eq!(result.code(), CODE_FAILURE);
        assert_eq!(result.message(), Some("container exited with code 125"));
        assert_eq!(
            log.contents(),
            "Container 'repo-ubuntu-tok-0' failed: container exited with code 125\n"
        );
    }

    #[test]
    fn launch_error_carries_underlying_message() {
        let goal = goal(ScriptedRuntime::new(vec![Err(
            "No such file or directory (os error 2)".to_string(),
        )]));
        let log = MemoryLog::new();
        let params = ubuntu_date_params();
        let result = goal.execute(&Invocation {
            repo: "repo",
            parameters: &params,
            log: &log,
        });

        assert_eq!(result.code(), CODE_FAILURE);
        let message = result.message().expect("message");
        assert!(message.contains("No such file or directory"), "{message}");
        assert!(log.contents().contains("Container 'repo-ubuntu-tok-0' failed: "));
    }

    #[test]
    fn repeated_runs_use_distinct_container_names() {
        let runtime =
            ScriptedRuntime::new(vec![Ok(RuntimeExit::Success), Ok(RuntimeExit::Success)]);
        let goal = goal(runtime.clone());
        let log = MemoryLog::new();
        let params = ubuntu_date_params();
        for _ in 0..2 {
            goal.execute(&Invocation {
                repo: "repo",
                parameters: &params,
                log: &log,
            });
        }

        let names: Vec<String> = runtime.calls().into_iter().map(|c| c[3].clone()).collect();
        assert_eq!(names, vec!["--name=repo-ubuntu-tok-0", "--name=repo-ubuntu-tok-1"]);
    }

    #[test]
    fn run_goal_logs_parameters_first() {
        let goal = goal(ScriptedRuntime::new(vec![Ok(RuntimeExit::Success)]));
        let log = MemoryLog::new();
        let params = ubuntu_date_params();
        goal.run_goal(&Invocation {
            repo: "repo",
            parameters: &params,
            log: &log,
        });

        assert_eq!(
            log.contents(),
            "New goal, details => {\"image\":\"ubuntu\",\"version\":\"18.04\",\"command\":\"date\",\"args\":[\"+%s\"]}\n"
        );
    }
}
