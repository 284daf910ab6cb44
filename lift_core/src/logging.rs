//! Tracing setup for the liftstat binaries.
//!
//! The analyzers only emit `tracing` events (dropped records at warn, per-run
//! summaries at info, intermediate figures at debug); binaries install the
//! subscriber. Events go to stderr so `--json` output on stdout stays clean.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Crates whose events follow the chosen level; dependencies stay at warn
const LIFT_TARGETS: &[&str] = &["lift_core", "liftstat"];

/// Filter directives such as `lift_core=info,liftstat=info,warn`
fn default_directives(level: &str) -> String {
    let mut directives: Vec<String> = LIFT_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect();
    directives.push("warn".to_string());
    directives.join(",")
}

/// Initialize logging at INFO for the analytics crates
///
/// RUST_LOG replaces the default filter entirely when set.
pub fn init() {
    init_with_level("info")
}

/// Initialize logging with `default_level` (debug, info, warn, error) for the analytics crates
pub fn init_with_level(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(default_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Debug-level logging captured by the test harness
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new(default_directives("debug")))
        .try_init();
}
