//! Spawning child processes with output streamed into a progress log.

use std::io::{BufRead, BufReader, Read};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, instrument};

use crate::io::progress_log::ProgressLog;

/// Run `cmd` to completion, forwarding stdout and stderr line by line into `log`.
///
/// Both pipes are drained concurrently while the child runs, so output shows
/// up in the log as it is produced and neither pipe can fill up and block the
/// child. Blocks until the child exits; there is no timeout.
///
/// Returns `Err` only if the child could not be spawned or waited on.
#[instrument(skip_all, fields(program = ?cmd.get_program()))]
pub fn run_streaming(mut cmd: Command, log: &dyn ProgressLog) -> Result<ExitStatus> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!("spawning child process");
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            error!(err = %e, "failed to spawn command");
            return Err(e).context("spawn command");
        }
    };

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;

    let status = thread::scope(|scope| -> Result<ExitStatus> {
        let stdout_handle = scope.spawn(move || forward_lines(stdout, log));
        let stderr_handle = scope.spawn(move || forward_lines(stderr, log));

        let status = child.wait().context("wait for command");

        let stdout_bytes = join_forwarder(stdout_handle.join()).context("join stdout")?;
        let stderr_bytes = join_forwarder(stderr_handle.join()).context("join stderr")?;
        debug!(stdout_bytes, stderr_bytes, "output forwarded");
        status
    })?;

    debug!(exit_code = ?status.code(), "command finished");
    Ok(status)
}

fn join_forwarder(joined: thread::Result<Result<usize>>) -> Result<usize> {
    match joined {
        Ok(result) => result,
        Err(_) => Err(anyhow!("output forwarder thread panicked")),
    }
}

/// Copy `reader` into `log` one line at a time. Returns the bytes forwarded.
fn forward_lines<R: Read>(reader: R, log: &dyn ProgressLog) -> Result<usize> {
    let mut buf_reader = BufReader::new(reader);
    let mut total = 0usize;

    loop {
        let mut line = Vec::new();
        let n = buf_reader
            .read_until(b'\n', &mut line)
            .context("read line")?;
        if n == 0 {
            break;
        }
        log.write(&String::from_utf8_lossy(&line));
        total += n;
    }

    Ok(total)
}
