// tests/capture_execute.rs

#![cfg(unix)]

use std::error::Error;
use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;

use cmdexec::exec::{ExecOptions, LINE_SEPARATOR, execute};
use cmdexec_test_utils::recording::{RecordingErrors, RecordingPids};
use cmdexec_test_utils::{argv, init_tracing, sh, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn echo_hello_is_captured() -> TestResult {
    init_tracing();

    let result = execute(&argv(&["echo", "hello"]), ExecOptions::default()).await?;

    assert_eq!(result.exit_code, 0);
    assert_eq!(result.out_msg, "hello");
    assert_eq!(result.error_msg, "");
    assert_eq!(result.cmd, "echo hello");
    assert!(result.success());
    Ok(())
}

#[tokio::test]
async fn false_reports_exit_code_one() -> TestResult {
    init_tracing();

    let result = execute(&argv(&["false"]), ExecOptions::default()).await?;

    assert_eq!(result.exit_code, 1);
    assert!(!result.success());
    assert!(!result.is_failure_sentinel());
    Ok(())
}

#[tokio::test]
async fn stdout_and_stderr_are_captured_separately() -> TestResult {
    init_tracing();

    let spec = sh("for i in 1 2 3; do echo out$i; echo err$i >&2; done; echo tail >&2");
    let result = execute(&spec, ExecOptions::default()).await?;

    assert_eq!(result.exit_code, 0);
    assert_eq!(result.out_msg, ["out1", "out2", "out3"].join(LINE_SEPARATOR));
    assert_eq!(
        result.error_msg,
        ["err1", "err2", "err3", "tail"].join(LINE_SEPARATOR)
    );
    Ok(())
}

#[tokio::test]
async fn large_output_on_both_streams_does_not_deadlock() -> TestResult {
    init_tracing();

    // Well past a 64 KiB pipe buffer on each stream.
    let spec = sh(
        "i=0; while [ $i -lt 5000 ]; do \
         echo 'stdout line padding padding padding'; \
         echo 'stderr line padding padding padding' >&2; \
         i=$((i+1)); done",
    );
    let result = with_timeout(execute(&spec, ExecOptions::default())).await?;

    assert_eq!(result.exit_code, 0);
    assert_eq!(result.out_msg.lines().count(), 5000);
    assert_eq!(result.error_msg.lines().count(), 5000);
    Ok(())
}

#[tokio::test]
async fn signal_termination_maps_to_shell_convention() -> TestResult {
    init_tracing();

    let result = execute(&sh("kill -9 $$"), ExecOptions::default()).await?;

    assert_eq!(result.exit_code, 128 + 9);
    Ok(())
}

#[tokio::test]
async fn working_dir_is_applied() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;

    let opts = ExecOptions::default().with_cwd(dir.path());
    let result = execute(&argv(&["pwd"]), opts).await?;

    assert_eq!(result.exit_code, 0);
    assert_eq!(
        Path::new(&result.out_msg).canonicalize()?,
        dir.path().canonicalize()?
    );
    Ok(())
}

#[tokio::test]
async fn env_overrides_merge_with_inherited_environment() -> TestResult {
    init_tracing();

    // `sh` itself is found through the inherited PATH.
    let opts = ExecOptions::default().with_env("CMDEXEC_TEST_VAR", "merged");
    let result = execute(&sh("printf '%s' \"$CMDEXEC_TEST_VAR\"; test -n \"$PATH\""), opts).await?;

    assert_eq!(result.exit_code, 0);
    assert_eq!(result.out_msg, "merged");
    Ok(())
}

#[tokio::test]
async fn omit_discards_all_output() -> TestResult {
    init_tracing();

    let opts = ExecOptions::default().omit_output();
    let result = execute(&sh("echo hidden; echo hidden >&2; exit 4"), opts).await?;

    assert_eq!(result.exit_code, 4);
    assert_eq!(result.out_msg, "");
    assert_eq!(result.error_msg, "");
    Ok(())
}

#[tokio::test]
async fn stdin_is_bound_to_null() -> TestResult {
    init_tracing();

    // `cat` would block forever on an inherited terminal.
    let result = with_timeout(execute(&argv(&["cat"]), ExecOptions::default())).await?;

    assert_eq!(result.exit_code, 0);
    assert_eq!(result.out_msg, "");
    Ok(())
}

#[tokio::test]
async fn custom_redirect_writes_to_caller_files() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let out_path = dir.path().join("out.log");
    let err_path = dir.path().join("err.log");

    let opts = ExecOptions::default()
        .redirect_to_files(File::create(&out_path)?, File::create(&err_path)?);
    let result = execute(&sh("echo to-file; echo to-err >&2"), opts).await?;

    assert_eq!(result.exit_code, 0);
    assert_eq!(result.out_msg, "");
    assert_eq!(result.error_msg, "");
    assert_eq!(fs::read_to_string(&out_path)?, "to-file\n");
    assert_eq!(fs::read_to_string(&err_path)?, "to-err\n");
    Ok(())
}

#[tokio::test]
async fn process_handler_is_called_once_with_pid() -> TestResult {
    init_tracing();
    let pids = RecordingPids::new();
    let errors = RecordingErrors::new();

    let opts = ExecOptions::default()
        .on_process_created(pids.clone())
        .on_error(errors.clone());
    let result = execute(&argv(&["true"]), opts).await?;

    assert_eq!(result.exit_code, 0);
    assert_eq!(pids.calls(), 1);
    assert!(pids.pids()[0].is_some());
    assert!(errors.errors().is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn many_executions_run_concurrently() -> TestResult {
    init_tracing();

    let started = Instant::now();
    let mut set = JoinSet::new();
    for i in 0..16 {
        set.spawn(async move {
            let spec = sh(&format!("sleep 1; echo {i}"));
            execute(&spec, ExecOptions::default()).await
        });
    }

    let mut outputs = Vec::new();
    while let Some(joined) = set.join_next().await {
        let result = joined??;
        assert_eq!(result.exit_code, 0);
        outputs.push(result.out_msg.parse::<u32>()?);
    }
    outputs.sort_unstable();

    assert_eq!(outputs, (0..16).collect::<Vec<_>>());
    // Sixteen one-second sleeps on two worker threads only fit if nothing
    // holds a thread while waiting.
    assert!(
        started.elapsed() < Duration::from_secs(6),
        "executions did not overlap: {:?}",
        started.elapsed()
    );
    Ok(())
}
