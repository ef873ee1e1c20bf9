//! logging.rs
//! One-time `tracing` subscriber setup.
use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "fs_core=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a fmt subscriber writing to stderr, filtered by `RUST_LOG`.
/// Safe to call repeatedly; a subscriber installed elsewhere is left alone.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_thread_names(true)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Test-only variant: output goes through the test harness capture, so it
/// shows up only for failing tests.
pub fn init_test_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_thread_names(true)
            .with_test_writer()
            .try_init();
    });
}
