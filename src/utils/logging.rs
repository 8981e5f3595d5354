//! Logging setup
//!
//! One `tracing-subscriber` registration for the whole process; modules
//! log through the `tracing` macros.

use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber.
///
/// Honors `RUST_LOG`, defaulting to `info`. Safe to call more than once
/// (subsequent calls are no-ops), which keeps tests that share a process
/// from panicking.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
