//! Logging setup
//!
//! Log lines go to stderr so they never interleave with prompts or the
//! report on stdout. The level comes from `RUST_LOG` (default `warn`), e.g.
//! `RUST_LOG=foxhole_calculator=debug` to trace every resolution step.

use tracing_subscriber::{EnvFilter, fmt};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

/// Verbose logging captured by the test harness
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
