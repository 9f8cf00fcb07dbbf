//! Tracing subscriber setup for the CLI.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Filtering follows `RUST_LOG`, defaulting
/// to warnings; diagnostics go to stderr so header output on stdout stays
/// clean.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
