pub mod builders;
pub mod fake_agent;
pub mod sources;

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

use promptdag::events::SchedulerEvent;
use tokio::sync::broadcast;

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

/// Drain events until `ExecutionStopped` arrives, returning everything
/// received up to and including it.
pub async fn recv_until_stopped(
    rx: &mut broadcast::Receiver<SchedulerEvent>,
) -> Vec<SchedulerEvent> {
    with_timeout(async {
        let mut events = Vec::new();
        loop {
            let event = rx.recv().await.expect("event stream closed unexpectedly");
            let stopped = matches!(event, SchedulerEvent::ExecutionStopped);
            events.push(event);
            if stopped {
                return events;
            }
        }
    })
    .await
}
