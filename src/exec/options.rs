// src/exec/options.rs

//! Per-call configuration for the executor entry points.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{ExecError, Result};
use crate::exec::handlers::{ErrorHandler, LineHandler, NoopErrorHandler, ProcessHandler};

/// Timeout applied when the caller does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest timeout accepted from config files and the command line (one
/// year). The executors themselves take any `Duration`.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(365 * 86_400);

/// Working directory, environment overrides and timeout shared by all three
/// entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecConfig {
    pub working_dir: PathBuf,
    /// Merged over the inherited environment.
    pub env: BTreeMap<String, String>,
    pub timeout: Duration,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            env: BTreeMap::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Where the child's stdout/stderr go in the capturing executor.
#[derive(Debug, Default)]
pub enum Redirect {
    /// Pipe both streams back for in-process capture.
    #[default]
    Capture,
    /// Bind stdin, stdout and stderr to the null device.
    Omit,
    /// Hand both streams to caller-opened files. The executor never creates,
    /// truncates or rotates them.
    Files { stdout: File, stderr: File },
}

/// Destinations for the synchronous file-redirected executor.
///
/// `None` means the null device.
#[derive(Debug, Default)]
pub struct SyncOutput {
    pub stdout: Option<File>,
    pub stderr: Option<File>,
}

impl SyncOutput {
    pub fn to_files(stdout: File, stderr: File) -> Self {
        Self {
            stdout: Some(stdout),
            stderr: Some(stderr),
        }
    }
}

/// Everything the capturing executor needs besides the argv.
///
/// The options are consumed by [`execute`](crate::exec::execute), so the
/// handlers never outlive the call.
pub struct ExecOptions {
    pub config: ExecConfig,
    pub redirect: Redirect,
    pub(crate) line_handler: Option<Box<dyn LineHandler>>,
    pub(crate) process_handler: Option<Box<dyn ProcessHandler>>,
    pub(crate) error_handler: Box<dyn ErrorHandler>,
}

impl ExecOptions {
    pub fn new(config: ExecConfig) -> Self {
        Self {
            config,
            redirect: Redirect::Capture,
            line_handler: None,
            process_handler: None,
            error_handler: Box::new(NoopErrorHandler),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn with_cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.working_dir = dir.into();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.env.insert(key.into(), value.into());
        self
    }

    pub fn omit_output(mut self) -> Self {
        self.redirect = Redirect::Omit;
        self
    }

    pub fn redirect_to_files(mut self, stdout: File, stderr: File) -> Self {
        self.redirect = Redirect::Files { stdout, stderr };
        self
    }

    pub fn on_line(mut self, handler: impl LineHandler + 'static) -> Self {
        self.line_handler = Some(Box::new(handler));
        self
    }

    pub fn on_process_created(mut self, handler: impl ProcessHandler + 'static) -> Self {
        self.process_handler = Some(Box::new(handler));
        self
    }

    pub fn on_error(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.error_handler = Box::new(handler);
        self
    }

    /// Reject combinations that can never produce output for the caller.
    ///
    /// A line handler reads from the stdout pipe, which does not exist once
    /// stdout is redirected to a file.
    pub fn validate(&self) -> Result<()> {
        if matches!(self.redirect, Redirect::Files { .. }) && self.line_handler.is_some() {
            return Err(ExecError::ConflictingOutput);
        }
        Ok(())
    }
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self::new(ExecConfig::default())
    }
}

impl fmt::Debug for ExecOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecOptions")
            .field("config", &self.config)
            .field("redirect", &self.redirect)
            .field("line_handler", &self.line_handler.is_some())
            .field("process_handler", &self.process_handler.is_some())
            .finish_non_exhaustive()
    }
}
