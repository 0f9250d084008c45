// src/exec/command.rs

//! Command specification and the spawn primitive shared by every entry point.

use std::fmt;
use std::process::Command;

use crate::errors::{ExecError, Result};
use crate::exec::options::ExecConfig;

/// Path of the OS null device for the host platform.
pub const NULL_DEVICE: &str = if cfg!(windows) { "NUL" } else { "/dev/null" };

/// Separator used when joining captured lines back into one string.
pub const LINE_SEPARATOR: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// An argv vector: the executable followed by its arguments.
///
/// Arguments are handed to the OS as-is; nothing is shell-expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    argv: Vec<String>,
}

impl CommandSpec {
    /// Build a spec from any sequence of strings. Fails on an empty argv.
    pub fn new<I, S>(argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        if argv.is_empty() {
            return Err(ExecError::EmptyCommand);
        }
        Ok(Self { argv })
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// The argv joined with single spaces. Diagnostics only; never re-parsed.
    pub fn display(&self) -> String {
        self.argv.join(" ")
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Build a `std::process::Command` with program, arguments, working
/// directory and environment overrides applied.
///
/// `envs` merges over the inherited environment rather than replacing it.
/// Stdio wiring is left to the caller since it differs per entry point.
pub(crate) fn base_command(spec: &CommandSpec, config: &ExecConfig) -> Command {
    let mut cmd = Command::new(spec.program());
    cmd.args(spec.args())
        .current_dir(&config.working_dir)
        .envs(&config.env);
    cmd
}
