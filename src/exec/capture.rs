// src/exec/capture.rs

//! Blocking-capturing execution: spawn, drain concurrently, wait with a
//! deadline, and fold every failure into an [`ExecResult`].

use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::time::{Instant, timeout_at};
use tracing::{debug, error, info, warn};

use crate::errors::{ExecError, Result};
use crate::exec::command::{CommandSpec, base_command};
use crate::exec::handlers::ErrorHandler;
use crate::exec::options::{ExecOptions, Redirect};
use crate::exec::result::{EXEC_FAILED, ExecResult, exit_code_of};
use crate::exec::stream::{BackgroundDrain, drain_to_handler};

/// How long background drains may keep reading once the wait step is over.
pub const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Stand-in deadline distance for timeouts too large to add to an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Run `spec` to completion (or timeout) and capture its output.
///
/// Returns `Err` only for usage errors detected before anything is spawned
/// (see [`ExecOptions::validate`]). Spawn failures, wait failures and
/// timeouts are passed to the error handler and reported as a result with
/// exit code [`EXEC_FAILED`] and the error text in `error_msg`.
///
/// A child still running at the deadline is killed.
pub async fn execute(spec: &CommandSpec, opts: ExecOptions) -> Result<ExecResult> {
    if let Err(err) = opts.validate() {
        error!(cmd = %spec, error = %err, "rejecting exec request");
        return Err(err);
    }

    let ExecOptions {
        config,
        redirect,
        line_handler,
        process_handler,
        mut error_handler,
    } = opts;

    let cmd_line = spec.display();
    info!(
        cmd = %cmd_line,
        cwd = %config.working_dir.display(),
        timeout = ?config.timeout,
        "executing command"
    );

    let mut command = Command::from(base_command(spec, &config));
    wire_stdio(&mut command, redirect);
    command.kill_on_drop(true);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(source) => {
            let err = ExecError::Spawn {
                cmd: cmd_line.clone(),
                source,
            };
            return Ok(failed(
                &mut *error_handler,
                None,
                err,
                String::new(),
                cmd_line,
            ));
        }
    };

    let pid = child.id();
    debug!(cmd = %cmd_line, pid, "process spawned");

    if let Some(mut handler) = process_handler {
        handler.on_process_created(&child);
    }

    // The deadline starts after spawn and covers both the line-handler
    // drain and the wait.
    let deadline = deadline_after(config.timeout);

    let stdout = child.stdout.take();
    let stderr_drain = child
        .stderr
        .take()
        .map(|stderr| BackgroundDrain::spawn("stderr", stderr));

    let stdout_drain = match (line_handler, stdout) {
        (Some(mut handler), Some(stdout)) => {
            match timeout_at(deadline, drain_to_handler(stdout, &mut *handler)).await {
                Ok(lines) => debug!(cmd = %cmd_line, pid, lines, "stdout delivered to line handler"),
                Err(_) => warn!(
                    cmd = %cmd_line,
                    pid,
                    "stdout still open at deadline; stopping line handler"
                ),
            }
            None
        }
        (None, Some(stdout)) => Some(BackgroundDrain::spawn("stdout", stdout)),
        (_, None) => None,
    };

    let waited = wait_until(&mut child, deadline, &cmd_line, config.timeout).await;

    let out_msg = match stdout_drain {
        Some(drain) => drain.finish(DRAIN_GRACE).await,
        None => String::new(),
    };
    let error_msg = match stderr_drain {
        Some(drain) => drain.finish(DRAIN_GRACE).await,
        None => String::new(),
    };

    match waited {
        Ok(exit_code) => {
            info!(cmd = %cmd_line, pid, exit_code, "process exited");
            Ok(ExecResult {
                exit_code,
                out_msg,
                error_msg,
                cmd: cmd_line,
            })
        }
        Err(err) => Ok(failed(&mut *error_handler, pid, err, out_msg, cmd_line)),
    }
}

/// `timeout` from now, pinned to a far-future instant when the sum would
/// overflow (e.g. `Duration::MAX`).
fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or(now + FAR_FUTURE)
}

fn wire_stdio(command: &mut Command, redirect: Redirect) {
    command.stdin(Stdio::null());

    match redirect {
        Redirect::Capture => {
            command.stdout(Stdio::piped()).stderr(Stdio::piped());
        }
        Redirect::Omit => {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }
        Redirect::Files { stdout, stderr } => {
            command.stdout(Stdio::from(stdout)).stderr(Stdio::from(stderr));
        }
    }
}

/// Wait for exit until `deadline`; on timeout kill the child and report
/// [`ExecError::Timeout`].
async fn wait_until(
    child: &mut Child,
    deadline: Instant,
    cmd_line: &str,
    timeout: Duration,
) -> Result<i32> {
    match timeout_at(deadline, child.wait()).await {
        Ok(Ok(status)) => Ok(exit_code_of(status)),
        Ok(Err(source)) => Err(ExecError::Wait {
            cmd: cmd_line.to_string(),
            source,
        }),
        Err(_) => {
            warn!(cmd = %cmd_line, pid = child.id(), ?timeout, "timeout elapsed; killing process");
            if let Err(e) = child.kill().await {
                warn!(cmd = %cmd_line, error = %e, "failed to kill timed-out process");
            }
            Err(ExecError::Timeout {
                cmd: cmd_line.to_string(),
                timeout,
            })
        }
    }
}

fn failed(
    handler: &mut dyn ErrorHandler,
    pid: Option<u32>,
    err: ExecError,
    out_msg: String,
    cmd: String,
) -> ExecResult {
    error!(cmd = %cmd, pid, error = %err, "command execution failed");
    handler.handle_error(pid, &err);

    ExecResult {
        exit_code: EXEC_FAILED,
        out_msg,
        error_msg: err.to_string(),
        cmd,
    }
}
