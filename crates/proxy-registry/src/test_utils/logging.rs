//! Log output for tests.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a test-writer subscriber filtered by `RUST_LOG`. Logging is off when unset.
///
/// Safe to call from every test; only the first call installs the subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
}
