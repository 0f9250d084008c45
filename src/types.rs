use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

/// How a command is run, as selected in the `[output]` section or with
/// `--mode`.
///
/// - `Capture`: buffer stdout and stderr in memory (default).
/// - `Lines`: stream stdout line by line as it arrives; stderr is buffered.
/// - `Omit`: bind every stream to the null device.
/// - `Files`: redirect stdout/stderr to files, still waiting asynchronously.
/// - `Sync`: redirect to files and block the calling thread; exit code only.
/// - `Spawn`: start the process and return without waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Capture,
    Lines,
    Omit,
    Files,
    Sync,
    Spawn,
}

impl RunMode {
    /// Modes whose output goes to the configured stdout/stderr paths.
    pub fn uses_output_files(self) -> bool {
        matches!(self, RunMode::Files | RunMode::Sync)
    }
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "capture" => Ok(RunMode::Capture),
            "lines" => Ok(RunMode::Lines),
            "omit" => Ok(RunMode::Omit),
            "files" => Ok(RunMode::Files),
            "sync" => Ok(RunMode::Sync),
            "spawn" => Ok(RunMode::Spawn),
            other => Err(format!(
                "invalid run mode: {other} (expected capture, lines, omit, files, sync or spawn)"
            )),
        }
    }
}
