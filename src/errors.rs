// src/errors.rs

//! Crate-wide error type and result alias.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("command must contain at least the executable")]
    EmptyCommand,

    #[error("cannot use a custom redirect and a line handler simultaneously")]
    ConflictingOutput,

    #[error("failed to spawn '{cmd}': {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for '{cmd}': {source}")]
    Wait {
        cmd: String,
        #[source]
        source: std::io::Error,
    },

    #[error("process '{cmd}' has not exited after {timeout:?}")]
    Timeout { cmd: String, timeout: Duration },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl ExecError {
    /// True for errors raised before any process was spawned.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, ExecError::EmptyCommand | ExecError::ConflictingOutput)
    }
}

pub type Result<T> = std::result::Result<T, ExecError>;
