// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_and_validate};
use crate::exec::{CommandSpec, ExecOptions, ExecResult, MAX_TIMEOUT, SyncOutput};
use crate::types::RunMode;

/// High-level entry point used by `main.rs`.
///
/// Resolves the effective configuration (config file, then CLI overrides),
/// runs the command in the selected mode and returns the exit status the
/// `cmdexec` process should finish with.
pub async fn run(args: CliArgs) -> Result<i32> {
    let cfg = resolve_config(&args)?;
    let spec = CommandSpec::new(args.command.iter().cloned())?;

    info!(mode = ?cfg.mode, cmd = %spec, "running command");

    match cfg.mode {
        RunMode::Capture | RunMode::Omit | RunMode::Files => {
            let opts = waiting_options(&cfg)?;
            let result = exec::execute(&spec, opts).await?;
            report_captured(&result)
        }
        RunMode::Lines => {
            let opts = ExecOptions::new(cfg.exec.clone()).on_line(|line: &str| {
                println!("{line}");
            });
            let result = exec::execute(&spec, opts).await?;
            report_captured(&result)
        }
        RunMode::Sync => {
            let output = SyncOutput::to_files(
                open_output(&cfg.stdout)?,
                open_output(&cfg.stderr)?,
            );
            let exec_cfg = cfg.exec.clone();
            let code =
                tokio::task::spawn_blocking(move || exec::execute_sync(&spec, &exec_cfg, output))
                    .await
                    .context("sync execution task panicked")?;
            if code < 0 {
                eprintln!("cmdexec: command failed with sentinel {code}");
            }
            Ok(process_exit_code(code))
        }
        RunMode::Spawn => {
            let child = exec::spawn_detached(&spec, &cfg.exec)?;
            println!("{}", child.id());
            Ok(0)
        }
    }
}

/// Merge CLI flags over the config file (or the built-in defaults).
pub fn resolve_config(args: &CliArgs) -> Result<ConfigFile> {
    let mut cfg = match &args.config {
        Some(path) => load_and_validate(path)
            .with_context(|| format!("loading config file '{}'", path.display()))?,
        None => ConfigFile::default(),
    };

    if let Some(dir) = &args.cwd {
        cfg.exec.working_dir = dir.clone();
    }
    if let Some(secs) = args.timeout {
        let timeout = Duration::from_secs(secs);
        if timeout.is_zero() {
            bail!("--timeout must be greater than zero");
        }
        if timeout > MAX_TIMEOUT {
            bail!("--timeout must not exceed {} seconds", MAX_TIMEOUT.as_secs());
        }
        cfg.exec.timeout = timeout;
    }
    cfg.exec.env.extend(args.env.iter().cloned());
    if let Some(mode) = args.mode {
        cfg.mode = mode;
    }
    if let Some(path) = &args.stdout {
        cfg.stdout = path.clone();
    }
    if let Some(path) = &args.stderr {
        cfg.stderr = path.clone();
    }

    if !cfg.mode.uses_output_files() && (args.stdout.is_some() || args.stderr.is_some()) {
        bail!("--stdout/--stderr are only valid with --mode files or --mode sync");
    }

    debug!(?cfg, "resolved configuration");
    Ok(cfg)
}

/// Map an executor exit code onto a process exit status.
///
/// Negative sentinels cannot be process statuses, so they become 1.
pub fn process_exit_code(code: i32) -> i32 {
    if code < 0 { 1 } else { code }
}

fn waiting_options(cfg: &ConfigFile) -> Result<ExecOptions> {
    let opts = ExecOptions::new(cfg.exec.clone());
    let opts = match cfg.mode {
        RunMode::Omit => opts.omit_output(),
        RunMode::Files => {
            opts.redirect_to_files(open_output(&cfg.stdout)?, open_output(&cfg.stderr)?)
        }
        _ => opts,
    };
    Ok(opts)
}

fn open_output(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("opening output file '{}'", path.display()))
}

fn report_captured(result: &ExecResult) -> Result<i32> {
    if result.is_failure_sentinel() {
        eprintln!("cmdexec: {}", result.error_msg);
        return Ok(process_exit_code(result.exit_code));
    }

    let mut stdout = std::io::stdout().lock();
    if !result.out_msg.is_empty() {
        writeln!(stdout, "{}", result.out_msg).context("writing captured stdout")?;
    }
    stdout.flush().context("flushing stdout")?;

    if !result.error_msg.is_empty() {
        eprintln!("{}", result.error_msg);
    }

    Ok(process_exit_code(result.exit_code))
}
