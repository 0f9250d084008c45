// src/exec/mod.rs

//! Process execution layer.
//!
//! Three entry points share one spawn primitive (`command::base_command`):
//!
//! - [`capture::execute`] spawns, drains stdout/stderr concurrently on Tokio
//!   tasks, waits with a deadline and returns an [`ExecResult`].
//! - [`sync::execute_sync`] redirects output to files, blocks the calling
//!   thread and returns only the exit code.
//! - [`detached::spawn_detached`] returns the live process without waiting.
//!
//! - [`handlers`] holds the line / process-created / error callback traits.
//! - `stream` contains the line drains used by the capturing executor.

pub mod capture;
pub mod command;
pub mod detached;
pub mod handlers;
pub mod options;
pub mod result;
mod stream;
pub mod sync;

pub use capture::{DRAIN_GRACE, execute};
pub use command::{CommandSpec, LINE_SEPARATOR, NULL_DEVICE};
pub use detached::spawn_detached;
pub use handlers::{ErrorHandler, LineHandler, NoopErrorHandler, ProcessHandler};
pub use options::{DEFAULT_TIMEOUT, ExecConfig, ExecOptions, MAX_TIMEOUT, Redirect, SyncOutput};
pub use result::{EXEC_FAILED, ExecResult, SPAWN_FAILED, TIMED_OUT};
pub use sync::execute_sync;
