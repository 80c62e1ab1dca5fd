use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt};

/// Routes `tracing` output through the test harness, filtered by `RUST_LOG`.
/// Safe to call from every test.
pub fn init() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
