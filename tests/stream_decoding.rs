// tests/stream_decoding.rs

#![cfg(unix)]

use std::error::Error;

use cmdexec::exec::{ExecOptions, LINE_SEPARATOR, execute};
use cmdexec_test_utils::recording::RecordingLines;
use cmdexec_test_utils::{init_tracing, sh};

type TestResult = Result<(), Box<dyn Error>>;

const LINES: usize = 20_000;

/// A Latin-1 `é` (not UTF-8) followed by enough output to overflow a pipe
/// buffer, then a distinctive exit code.
fn latin1_then_flood(redirect: &str) -> String {
    format!(
        "printf 'caf\\351\\n' {redirect}; \
         i=0; while [ $i -lt {LINES} ]; do echo line$i {redirect}; i=$((i+1)); done; \
         exit 3"
    )
}

#[tokio::test]
async fn invalid_utf8_on_stdout_is_replaced_in_capture() -> TestResult {
    init_tracing();

    let result = execute(&sh(&latin1_then_flood("")), ExecOptions::default()).await?;

    assert_eq!(result.exit_code, 3);
    let lines: Vec<&str> = result.out_msg.split(LINE_SEPARATOR).collect();
    assert_eq!(lines.len(), LINES + 1);
    assert_eq!(lines[0], "caf\u{FFFD}");
    assert_eq!(lines[LINES], format!("line{}", LINES - 1));
    Ok(())
}

#[tokio::test]
async fn invalid_utf8_on_stderr_is_replaced_in_capture() -> TestResult {
    init_tracing();

    let spec = sh(&format!("echo out; {}", latin1_then_flood(">&2")));
    let result = execute(&spec, ExecOptions::default()).await?;

    assert_eq!(result.exit_code, 3);
    assert_eq!(result.out_msg, "out");
    let lines: Vec<&str> = result.error_msg.split(LINE_SEPARATOR).collect();
    assert_eq!(lines.len(), LINES + 1);
    assert_eq!(lines[0], "caf\u{FFFD}");
    assert_eq!(lines[LINES], format!("line{}", LINES - 1));
    Ok(())
}

#[tokio::test]
async fn invalid_utf8_on_stdout_reaches_line_handler() -> TestResult {
    init_tracing();
    let lines = RecordingLines::new();

    let opts = ExecOptions::default().on_line(lines.clone());
    let result = execute(&sh(&latin1_then_flood("")), opts).await?;

    assert_eq!(result.exit_code, 3);
    let seen = lines.lines();
    assert_eq!(seen.len(), LINES + 1);
    assert_eq!(seen[0], "caf\u{FFFD}");
    assert_eq!(seen[1], "line0");
    assert_eq!(result.out_msg, "");
    Ok(())
}

#[tokio::test]
async fn invalid_utf8_on_stderr_with_line_handler() -> TestResult {
    init_tracing();
    let lines = RecordingLines::new();

    let spec = sh(&format!("echo a; echo b; {}", latin1_then_flood(">&2")));
    let opts = ExecOptions::default().on_line(lines.clone());
    let result = execute(&spec, opts).await?;

    assert_eq!(result.exit_code, 3);
    assert_eq!(lines.lines(), vec!["a", "b"]);
    let err_lines: Vec<&str> = result.error_msg.split(LINE_SEPARATOR).collect();
    assert_eq!(err_lines.len(), LINES + 1);
    assert_eq!(err_lines[0], "caf\u{FFFD}");
    Ok(())
}

#[tokio::test]
async fn crlf_endings_are_trimmed() -> TestResult {
    init_tracing();

    let result = execute(&sh("printf 'one\\r\\ntwo\\r\\n'"), ExecOptions::default()).await?;

    assert_eq!(result.out_msg, ["one", "two"].join(LINE_SEPARATOR));
    Ok(())
}
