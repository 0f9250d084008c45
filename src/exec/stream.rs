// src/exec/stream.rs

//! Line-oriented drains for child stdout/stderr pipes.
//!
//! Lines are split on `\n` (a trailing `\r` is dropped too) and decoded
//! lossily, so bytes that are not UTF-8 come out as U+FFFD instead of ending
//! the drain. A pipe is always read to end-of-stream: after a read error the
//! rest is discarded, but the child never sees its reader go away.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::exec::command::LINE_SEPARATOR;
use crate::exec::handlers::LineHandler;

/// Consecutive read errors tolerated while discarding before giving up.
const MAX_DISCARD_ERRORS: usize = 8;

/// A pipe being read to end-of-stream by its own Tokio task.
///
/// Lines land in a shared buffer as they arrive, so whatever was read is
/// still available if the task has to be aborted.
pub(crate) struct BackgroundDrain {
    stream: &'static str,
    lines: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl BackgroundDrain {
    pub(crate) fn spawn<R>(stream: &'static str, reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);

        let handle = tokio::spawn(async move {
            drain_lines(stream, BufReader::new(reader), |line| {
                sink.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(line);
            })
            .await;
        });

        Self {
            stream,
            lines,
            handle,
        }
    }

    /// Wait up to `grace` for end-of-stream, then return the joined lines.
    ///
    /// If the pipe is still open after `grace` (a grandchild holding it, or a
    /// child that was left running), the reader is aborted and the capture is
    /// truncated to what was read.
    pub(crate) async fn finish(mut self, grace: Duration) -> String {
        match tokio::time::timeout(grace, &mut self.handle).await {
            Ok(Ok(_)) => {}
            Ok(Err(err)) => {
                warn!(stream = self.stream, error = %err, "drain task failed");
            }
            Err(_) => {
                debug!(
                    stream = self.stream,
                    ?grace,
                    "stream still open after grace period; truncating capture"
                );
                self.handle.abort();
            }
        }

        let lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(stream = self.stream, lines = lines.len(), "drain finished");
        lines.join(LINE_SEPARATOR)
    }
}

/// Feed every line of `reader` to `handler` on the current task.
///
/// Returns the number of lines delivered.
pub(crate) async fn drain_to_handler<R>(reader: R, handler: &mut dyn LineHandler) -> usize
where
    R: AsyncRead + Unpin,
{
    drain_lines("stdout", BufReader::new(reader), |line| {
        handler.on_output_line(&line)
    })
    .await
}

/// Read `reader` to end-of-stream, passing each decoded line to `on_line`.
///
/// On a read error the remaining bytes are discarded rather than recorded.
async fn drain_lines<R, F>(stream: &'static str, mut reader: R, mut on_line: F) -> usize
where
    R: AsyncBufRead + Unpin,
    F: FnMut(String),
{
    let mut buf = Vec::new();
    let mut count = 0;

    loop {
        match read_line_lossy(&mut reader, &mut buf).await {
            Ok(Some(line)) => {
                on_line(line);
                count += 1;
            }
            Ok(None) => break,
            Err(err) => {
                warn!(
                    stream,
                    error = %err,
                    lines = count,
                    "stream read failed; discarding the rest of the stream"
                );
                discard_rest(stream, &mut reader).await;
                break;
            }
        }
    }

    count
}

/// Next line without its `\n` / `\r\n` terminator, or `None` at end-of-stream.
async fn read_line_lossy<R>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

/// Keep the pipe drained until end-of-stream so the writer is not blocked
/// or killed by a closed reader.
async fn discard_rest<R>(stream: &'static str, reader: &mut R)
where
    R: AsyncBufRead + Unpin,
{
    let mut errors = 0;

    loop {
        match reader.fill_buf().await {
            Ok([]) => return,
            Ok(chunk) => {
                let len = chunk.len();
                reader.consume(len);
                errors = 0;
            }
            Err(err) => {
                errors += 1;
                if errors >= MAX_DISCARD_ERRORS {
                    warn!(stream, error = %err, "stream keeps failing; closing it");
                    return;
                }
            }
        }
    }
}
