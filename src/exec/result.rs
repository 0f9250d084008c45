// src/exec/result.rs

use std::process::ExitStatus;

/// Exit code reported by the capturing executor for any spawn, wait or
/// timeout failure.
pub const EXEC_FAILED: i32 = -1;

/// Exit code reported by the synchronous executor when the process could not
/// be created or an I/O call on it failed.
pub const SPAWN_FAILED: i32 = -100;

/// Exit code reported by the synchronous executor when the process was still
/// running at the deadline.
pub const TIMED_OUT: i32 = -200;

/// Outcome of one capturing execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Real exit code (non-negative) or [`EXEC_FAILED`].
    pub exit_code: i32,
    /// Captured stdout, lines joined with the platform separator. Empty when
    /// stdout was omitted, redirected, or consumed by a line handler.
    ///
    /// Older executors reported the placeholder `"omitRedirect"` in those
    /// modes; this one never does, so test for emptiness instead.
    pub out_msg: String,
    /// Captured stderr, or the failure message when `exit_code` is a sentinel.
    pub error_msg: String,
    /// The argv joined with single spaces.
    pub cmd: String,
}

impl ExecResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn is_failure_sentinel(&self) -> bool {
        self.exit_code < 0
    }
}

/// Map an exit status to an integer code.
///
/// A child killed by signal `n` has no code; report `128 + n` like a shell
/// does so the value stays clear of the negative sentinels.
pub(crate) fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    EXEC_FAILED
}
