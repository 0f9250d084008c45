// src/exec/handlers.rs

//! Caller-supplied callbacks invoked by the capturing executor.
//!
//! Each trait has a blanket impl for matching closures, so callers can pass
//! `|line: &str| ...` directly. The executor calls them synchronously on the
//! task running [`execute`](crate::exec::execute) and drops them when the call
//! returns.

use tokio::process::Child;

use crate::errors::ExecError;

/// Receives stdout one line at a time, in the order the child wrote them.
pub trait LineHandler: Send {
    fn on_output_line(&mut self, line: &str);
}

impl<F> LineHandler for F
where
    F: FnMut(&str) + Send,
{
    fn on_output_line(&mut self, line: &str) {
        self(line)
    }
}

/// Called once, right after the child is spawned and before any draining.
///
/// Typical use is recording `child.id()` so the process can be killed from
/// elsewhere.
pub trait ProcessHandler: Send {
    fn on_process_created(&mut self, child: &Child);
}

impl<F> ProcessHandler for F
where
    F: FnMut(&Child) + Send,
{
    fn on_process_created(&mut self, child: &Child) {
        self(child)
    }
}

/// Called at most once per call when spawning or waiting fails.
///
/// `pid` is `None` when the process was never created.
pub trait ErrorHandler: Send {
    fn handle_error(&mut self, pid: Option<u32>, err: &ExecError);
}

impl<F> ErrorHandler for F
where
    F: FnMut(Option<u32>, &ExecError) + Send,
{
    fn handle_error(&mut self, pid: Option<u32>, err: &ExecError) {
        self(pid, err)
    }
}

/// Error handler that ignores everything. Used when the caller sets none.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopErrorHandler;

impl ErrorHandler for NoopErrorHandler {
    fn handle_error(&mut self, _pid: Option<u32>, _err: &ExecError) {}
}
