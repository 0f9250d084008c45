// src/config/validate.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::config::model::{ConfigFile, ExecSection, OutputSection, RawConfigFile};
use crate::errors::{ExecError, Result};
use crate::exec::{ExecConfig, MAX_TIMEOUT, NULL_DEVICE};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::ExecError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let exec = validate_exec_section(raw.exec)?;
        let (stdout, stderr) = validate_output_section(&raw.output)?;
        Ok(ConfigFile::new_unchecked(exec, raw.output.mode, stdout, stderr))
    }
}

fn validate_exec_section(section: ExecSection) -> Result<ExecConfig> {
    let timeout = resolve_timeout(&section)?;

    for key in section.env.keys() {
        validate_env_key(key)?;
    }
    for (key, value) in section.env.iter() {
        if value.contains('\0') {
            return Err(ExecError::ConfigError(format!(
                "[exec].env value for '{}' must not contain NUL",
                key
            )));
        }
    }

    let defaults = ExecConfig::default();
    Ok(ExecConfig {
        working_dir: section.working_dir.unwrap_or(defaults.working_dir),
        env: section.env,
        timeout,
    })
}

fn resolve_timeout(section: &ExecSection) -> Result<Duration> {
    let timeout = match (section.timeout_secs, section.timeout_ms) {
        (Some(_), Some(_)) => {
            return Err(ExecError::ConfigError(
                "[exec] sets both timeout_secs and timeout_ms; pick one".to_string(),
            ));
        }
        (Some(secs), None) => Duration::from_secs(secs),
        (None, Some(ms)) => Duration::from_millis(ms),
        (None, None) => ExecConfig::default().timeout,
    };

    if timeout.is_zero() {
        return Err(ExecError::ConfigError(
            "[exec] timeout must be greater than zero".to_string(),
        ));
    }
    if timeout > MAX_TIMEOUT {
        return Err(ExecError::ConfigError(format!(
            "[exec] timeout must not exceed {} seconds",
            MAX_TIMEOUT.as_secs()
        )));
    }
    Ok(timeout)
}

/// Keys the OS would reject or misparse when building the child environment.
pub fn validate_env_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ExecError::ConfigError(
            "environment variable name must not be empty".to_string(),
        ));
    }
    if key.contains('=') || key.contains('\0') {
        return Err(ExecError::ConfigError(format!(
            "environment variable name '{}' must not contain '=' or NUL",
            key
        )));
    }
    Ok(())
}

fn validate_output_section(section: &OutputSection) -> Result<(PathBuf, PathBuf)> {
    if !section.mode.uses_output_files() && (section.stdout.is_some() || section.stderr.is_some())
    {
        return Err(ExecError::ConfigError(format!(
            "[output] stdout/stderr paths are only used in files or sync mode (mode is {:?})",
            section.mode
        )));
    }

    let resolve = |path: &Option<PathBuf>| {
        path.clone()
            .unwrap_or_else(|| PathBuf::from(NULL_DEVICE))
    };
    Ok((resolve(&section.stdout), resolve(&section.stderr)))
}
