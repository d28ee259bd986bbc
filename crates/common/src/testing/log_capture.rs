//! Test log capture

use std::sync::Once;

static INIT: Once = Once::new();

/// Install a `tracing` subscriber writing to the test harness.
///
/// Honours `RUST_LOG`; safe to call from every test.
pub fn init_test_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}
