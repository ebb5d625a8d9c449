//! Shared helpers for `copypasta` integration tests.
//!
//! - [`builders`]: config files and throwaway `sh` commands
//! - [`harness`]: run a supervisor against a recording sink

pub mod builders;
pub mod harness;

use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

/// Upper bound for any single awaited step in a test.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static INIT: Once = Once::new();

/// Route supervisor and reader logs into the test output.
///
/// Filtered by `RUST_LOG`, defaulting to `copypasta=debug` so state changes
/// and reader shutdowns show up next to a failing assertion.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("copypasta=debug"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Await `f`, failing the test if it takes longer than [`TEST_TIMEOUT`].
///
/// A hung stream reader shows up as this panic rather than a stuck test run.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(TEST_TIMEOUT, f)
        .await
        .unwrap_or_else(|_| panic!("test step did not finish within {TEST_TIMEOUT:?}"))
}
