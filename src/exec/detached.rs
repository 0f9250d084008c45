// src/exec/detached.rs

use std::process::{Child, Stdio};

use tracing::info;

use crate::errors::{ExecError, Result};
use crate::exec::command::{CommandSpec, base_command};
use crate::exec::options::ExecConfig;

/// Start `spec` and hand the live process straight back.
///
/// All three stdio streams are piped, and `config.timeout` is ignored: the
/// caller now owns reading output, waiting and killing. Spawn failures are
/// returned as [`ExecError::Spawn`].
pub fn spawn_detached(spec: &CommandSpec, config: &ExecConfig) -> Result<Child> {
    let mut command = base_command(spec, config);
    command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let child = command.spawn().map_err(|source| ExecError::Spawn {
        cmd: spec.display(),
        source,
    })?;

    info!(cmd = %spec, pid = child.id(), "spawned detached process");
    Ok(child)
}
