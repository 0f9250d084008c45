use std::path::Path;

use cmdexec::config::{ConfigFile, ExecSection, OutputSection, RawConfigFile};
use cmdexec::errors::Result;
use cmdexec::types::RunMode;

/// Builder for `ConfigFile` to simplify test setup.
///
/// Goes through the same `TryFrom<RawConfigFile>` validation as a file
/// loaded from disk.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                exec: ExecSection::default(),
                output: OutputSection::default(),
            },
        }
    }

    pub fn working_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.exec.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.exec.timeout_secs = Some(secs);
        self
    }

    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.exec.timeout_ms = Some(ms);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.config
            .exec
            .env
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn mode(mut self, mode: RunMode) -> Self {
        self.config.output.mode = mode;
        self
    }

    pub fn stdout(mut self, path: impl AsRef<Path>) -> Self {
        self.config.output.stdout = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn stderr(mut self, path: impl AsRef<Path>) -> Self {
        self.config.output.stderr = Some(path.as_ref().to_path_buf());
        self
    }

    /// Validate without panicking, for tests that expect rejection.
    pub fn try_build(self) -> Result<ConfigFile> {
        ConfigFile::try_from(self.config)
    }

    pub fn build(self) -> ConfigFile {
        self.try_build()
            .expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
