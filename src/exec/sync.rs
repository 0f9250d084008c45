// src/exec/sync.rs

//! Synchronous, file-redirected execution.
//!
//! The OS copies the child's output straight into the target files, so
//! nothing is drained here: the calling thread just polls for exit until the
//! deadline.

use std::process::{Child, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use crate::errors::{ExecError, Result};
use crate::exec::command::{CommandSpec, base_command};
use crate::exec::options::{ExecConfig, SyncOutput};
use crate::exec::result::{SPAWN_FAILED, TIMED_OUT, exit_code_of};

/// Interval between exit checks while blocking.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Run `spec` with stdout/stderr redirected to `output` and stdin bound to
/// the null device, blocking the current thread.
///
/// Returns the real exit code, [`SPAWN_FAILED`] if the process could not be
/// created or an I/O call on it failed, or [`TIMED_OUT`] if it was still
/// running after `config.timeout` (it is killed in that case).
///
/// Do not call this from inside an async task; use
/// `tokio::task::spawn_blocking` there.
pub fn execute_sync(spec: &CommandSpec, config: &ExecConfig, output: SyncOutput) -> i32 {
    let cmd_line = spec.display();
    info!(cmd = %cmd_line, timeout = ?config.timeout, "execute_sync");

    match run_blocking(spec, config, output) {
        Ok(code) => {
            info!(cmd = %cmd_line, exit_code = code, "process exited");
            code
        }
        Err(err @ ExecError::Timeout { .. }) => {
            error!(cmd = %cmd_line, error = %err, "process timed out");
            TIMED_OUT
        }
        Err(err) => {
            error!(cmd = %cmd_line, error = %err, "process could not be run");
            SPAWN_FAILED
        }
    }
}

fn run_blocking(spec: &CommandSpec, config: &ExecConfig, output: SyncOutput) -> Result<i32> {
    let mut command = base_command(spec, config);
    command
        .stdin(Stdio::null())
        .stdout(output.stdout.map_or_else(Stdio::null, Stdio::from))
        .stderr(output.stderr.map_or_else(Stdio::null, Stdio::from));

    let mut child = command.spawn().map_err(|source| ExecError::Spawn {
        cmd: spec.display(),
        source,
    })?;

    // `None` when the timeout cannot be represented; such a child is only
    // waited for.
    let deadline = Instant::now().checked_add(config.timeout);

    loop {
        let polled = child.try_wait().map_err(|source| ExecError::Wait {
            cmd: spec.display(),
            source,
        })?;
        if let Some(status) = polled {
            return Ok(exit_code_of(status));
        }

        let pause = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    kill_and_reap(&mut child, spec);
                    return Err(ExecError::Timeout {
                        cmd: spec.display(),
                        timeout: config.timeout,
                    });
                }
                POLL_INTERVAL.min(deadline - now)
            }
            None => POLL_INTERVAL,
        };

        thread::sleep(pause);
    }
}

fn kill_and_reap(child: &mut Child, spec: &CommandSpec) {
    if let Err(e) = child.kill() {
        warn!(cmd = %spec, pid = child.id(), error = %e, "failed to kill timed-out process");
        return;
    }
    if let Err(e) = child.wait() {
        warn!(cmd = %spec, pid = child.id(), error = %e, "failed to reap killed process");
    }
}
