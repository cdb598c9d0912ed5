//! Tracing setup shared by the binaries.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber at the default `info` level.
pub fn init() {
    init_with_level("info")
}

/// Install the global subscriber with the given fallback level.
///
/// A `RUST_LOG` filter in the environment takes precedence over
/// `default_level`. Output uses the compact single-line format.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}
