//! Handlers that record what the executor hands them.
//!
//! Each recorder is cheap to clone; give one clone to `ExecOptions` and keep
//! the other to inspect after the call.

use std::sync::{Arc, Mutex};

use cmdexec::errors::ExecError;
use cmdexec::exec::{ErrorHandler, LineHandler, ProcessHandler};
use tokio::process::Child;

/// Collects every stdout line delivered to the line handler.
#[derive(Clone, Default)]
pub struct RecordingLines {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LineHandler for RecordingLines {
    fn on_output_line(&mut self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

/// Records the PID of every process-created callback.
#[derive(Clone, Default)]
pub struct RecordingPids {
    pids: Arc<Mutex<Vec<Option<u32>>>>,
}

impl RecordingPids {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pids(&self) -> Vec<Option<u32>> {
        self.pids.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.pids.lock().unwrap().len()
    }
}

impl ProcessHandler for RecordingPids {
    fn on_process_created(&mut self, child: &Child) {
        self.pids.lock().unwrap().push(child.id());
    }
}

/// A recorded error callback: the PID passed in and the error's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedError {
    pub pid: Option<u32>,
    pub message: String,
    pub timed_out: bool,
}

/// Records every error-handler invocation.
#[derive(Clone, Default)]
pub struct RecordingErrors {
    errors: Arc<Mutex<Vec<RecordedError>>>,
}

impl RecordingErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<RecordedError> {
        self.errors.lock().unwrap().clone()
    }
}

impl ErrorHandler for RecordingErrors {
    fn handle_error(&mut self, pid: Option<u32>, err: &ExecError) {
        self.errors.lock().unwrap().push(RecordedError {
            pid,
            message: err.to_string(),
            timed_out: matches!(err, ExecError::Timeout { .. }),
        });
    }
}
