pub mod builders;
pub mod recording;

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt};

use cmdexec::exec::CommandSpec;

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Run a future with a 5-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}

/// `sh -c <script>` as an argv. The executor itself never uses a shell;
/// tests opt into one explicitly when they need redirection or loops.
pub fn sh(script: &str) -> CommandSpec {
    CommandSpec::new(["sh", "-c", script]).expect("sh argv is non-empty")
}

/// Build a spec from string literals.
pub fn argv(parts: &[&str]) -> CommandSpec {
    CommandSpec::new(parts.iter().copied()).expect("test argv must be non-empty")
}
