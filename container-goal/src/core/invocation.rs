//! Container name and runtime argv construction.
//!
//! The argv layout is the wire contract with the container runtime:
//! `run --tty --rm --name=<name> <image>:<version> <command> <args...>`.
//! Arguments are discrete argv tokens and never pass through a shell.

use crate::core::types::ExecParams;

/// Build the container name for one invocation.
///
/// `token` must be fresh per invocation; it is what keeps concurrent and
/// historical runs of the same image in the same repository apart.
pub fn container_name(repo: &str, image: &str, token: &str) -> String {
    format!("{repo}-{image}-{token}")
}

/// Build the runtime argv (excluding the runtime program itself).
pub fn runtime_args(container_name: &str, params: &ExecParams) -> Vec<String> {
    let mut args = Vec::with_capacity(6 + params.args.len());
    args.push("run".to_string());
    args.push("--tty".to_string());
    args.push("--rm".to_string());
    args.push(format!("--name={container_name}"));
    args.push(format!("{}:{}", params.image, params.version));
    args.push(params.command.clone());
    args.extend(params.args.iter().cloned());
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(args: &[&str]) -> ExecParams {
        ExecParams {
            image: "ubuntu".to_string(),
            version: "18.04".to_string(),
            command: "date".to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn container_name_joins_repo_image_and_token() {
        assert_eq!(
            container_name("my-repo", "ubuntu", "abc123"),
            "my-repo-ubuntu-abc123"
        );
    }

    #[test]
    fn runtime_args_follow_run_contract() {
        let args = runtime_args("repo-ubuntu-t1", &params(&["+%s"]));
        assert_eq!(
            args,
            vec![
                "run",
                "--tty",
                "--rm",
                "--name=repo-ubuntu-t1",
                "ubuntu:18.04",
                "date",
                "+%s",
            ]
        );
    }

    #[test]
    fn runtime_args_allow_empty_argument_list() {
        let args = runtime_args("n", &params(&[]));
        assert_eq!(args.last().map(String::as_str), Some("date"));
        assert_eq!(args.len(), 6);
    }

    #[test]
    fn arguments_are_passed_verbatim_as_separate_tokens() {
        let args = runtime_args("n", &params(&["a b", "$(rm -rf /)", ""]));
        assert_eq!(&args[6..], &["a b", "$(rm -rf /)", ""]);
    }
}
