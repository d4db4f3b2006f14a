pub mod builders;
pub mod harness;

use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - Captured output is only shown for failing tests unless run with
///   `-- --nocapture`.
///
/// Enable levels with e.g. `RUST_LOG=livefire=debug cargo test`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Default deadline for anything a test awaits.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Run a future with a 5-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(TEST_TIMEOUT, f)
        .await
        .expect("Test timed out after 5 seconds")
}

/// Assert that `f` is still pending after `grace`.
pub async fn assert_still_pending<F, T>(f: F, grace: Duration)
where
    F: std::future::Future<Output = T>,
    T: std::fmt::Debug,
{
    if let Ok(v) = tokio::time::timeout(grace, f).await {
        panic!("expected future to stay pending, but it resolved with {v:?}");
    }
}
