// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::exec::ExecConfig;
use crate::types::RunMode;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [exec]
/// working_dir = "build"
/// timeout_secs = 30
/// env = { RUST_LOG = "debug" }
///
/// [output]
/// mode = "files"
/// stdout = "out.log"
/// stderr = "err.log"
/// ```
///
/// Both sections are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub exec: ExecSection,

    #[serde(default)]
    pub output: OutputSection,
}

/// `[exec]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecSection {
    /// Defaults to the current directory.
    pub working_dir: Option<PathBuf>,

    /// Wall-clock timeout in seconds. Mutually exclusive with `timeout_ms`.
    pub timeout_secs: Option<u64>,

    pub timeout_ms: Option<u64>,

    /// Merged over the inherited environment.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputSection {
    #[serde(default)]
    pub mode: RunMode,

    /// Target for stdout in `files` / `sync` mode. Defaults to the null device.
    pub stdout: Option<PathBuf>,

    /// Target for stderr in `files` / `sync` mode. Defaults to the null device.
    pub stderr: Option<PathBuf>,
}

/// Validated configuration.
///
/// Obtain one with `ConfigFile::try_from(raw)` or
/// [`load_and_validate`](crate::config::loader::load_and_validate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub exec: ExecConfig,
    pub mode: RunMode,
    pub stdout: PathBuf,
    pub stderr: PathBuf,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        exec: ExecConfig,
        mode: RunMode,
        stdout: PathBuf,
        stderr: PathBuf,
    ) -> Self {
        Self {
            exec,
            mode,
            stdout,
            stderr,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        let null = PathBuf::from(crate::exec::NULL_DEVICE);
        Self::new_unchecked(ExecConfig::default(), RunMode::default(), null.clone(), null)
    }
}
