// tests/sync_execute.rs

#![cfg(unix)]

use std::error::Error;
use std::fs::{self, File};
use std::time::{Duration, Instant};

use cmdexec::exec::{ExecConfig, SPAWN_FAILED, SyncOutput, TIMED_OUT, execute_sync};
use cmdexec_test_utils::{argv, init_tracing, sh};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn stdout_file_matches_child_output_byte_for_byte() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let out_path = dir.path().join("out.bin");
    let err_path = dir.path().join("err.txt");

    let output = SyncOutput::to_files(File::create(&out_path)?, File::create(&err_path)?);
    let code = execute_sync(
        &sh("printf 'alpha\\nbeta\\n\\ttabbed'; printf 'warn' >&2; exit 7"),
        &ExecConfig::default(),
        output,
    );

    assert_eq!(code, 7);
    assert_eq!(fs::read(&out_path)?, b"alpha\nbeta\n\ttabbed");
    assert_eq!(fs::read_to_string(&err_path)?, "warn");
    Ok(())
}

#[test]
fn null_sink_is_the_default_destination() {
    init_tracing();

    let code = execute_sync(
        &sh("echo discarded; echo discarded >&2"),
        &ExecConfig::default(),
        SyncOutput::default(),
    );

    assert_eq!(code, 0);
}

#[test]
fn env_and_working_dir_are_applied() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let out_path = dir.path().join("out.txt");

    let mut config = ExecConfig {
        working_dir: dir.path().to_path_buf(),
        ..ExecConfig::default()
    };
    config
        .env
        .insert("CMDEXEC_SYNC_VAR".to_string(), "sync-value".to_string());

    let output = SyncOutput {
        stdout: Some(File::create(&out_path)?),
        stderr: None,
    };
    let code = execute_sync(&sh("printf '%s' \"$CMDEXEC_SYNC_VAR\" > relative.txt"), &config, output);

    assert_eq!(code, 0);
    assert_eq!(
        fs::read_to_string(dir.path().join("relative.txt"))?,
        "sync-value"
    );
    Ok(())
}

#[test]
fn missing_executable_returns_spawn_sentinel() {
    init_tracing();

    let code = execute_sync(
        &argv(&["cmdexec-no-such-binary"]),
        &ExecConfig::default(),
        SyncOutput::default(),
    );

    assert_eq!(code, SPAWN_FAILED);
}

#[test]
fn timeout_returns_distinct_sentinel() {
    init_tracing();

    let config = ExecConfig {
        timeout: Duration::from_millis(500),
        ..ExecConfig::default()
    };

    let started = Instant::now();
    let code = execute_sync(&argv(&["sleep", "30"]), &config, SyncOutput::default());

    assert_eq!(code, TIMED_OUT);
    assert_ne!(TIMED_OUT, SPAWN_FAILED);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn unrepresentable_timeout_waits_for_exit() {
    init_tracing();

    for timeout in [Duration::MAX, Duration::from_secs(u64::MAX)] {
        let config = ExecConfig {
            timeout,
            ..ExecConfig::default()
        };
        let code = execute_sync(&sh("exit 6"), &config, SyncOutput::default());
        assert_eq!(code, 6);
    }
}
