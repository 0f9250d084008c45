// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::validate::validate_env_key;
use crate::types::RunMode;

/// Command-line arguments for `cmdexec`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cmdexec",
    version,
    about = "Run a command with a timeout and capture or redirect its output.",
    long_about = None
)]
pub struct CliArgs {
    /// Optional config file (TOML) with `[exec]` and `[output]` defaults.
    ///
    /// Flags given on the command line override values from the file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Working directory for the child process.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Timeout in seconds (default 10).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Extra environment variable for the child, as KEY=VALUE. Repeatable.
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    pub env: Vec<(String, String)>,

    /// How to run the command.
    #[arg(long, value_enum, value_name = "MODE")]
    pub mode: Option<RunMode>,

    /// stdout target for `files` and `sync` modes.
    #[arg(long, value_name = "PATH")]
    pub stdout: Option<PathBuf>,

    /// stderr target for `files` and `sync` modes.
    #[arg(long, value_name = "PATH")]
    pub stderr: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CMDEXEC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// The command and its arguments. Passed as-is, never through a shell.
    #[arg(
        value_name = "CMD",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn parse_env_pair(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    validate_env_key(key).map_err(|e| e.to_string())?;
    Ok((key.to_string(), value.to_string()))
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
