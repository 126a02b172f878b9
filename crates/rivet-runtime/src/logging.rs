//! Log subscriber setup
//!
//! The runtime emits `tracing` events under the `rivet::invoke` target.
//! Applications that already install a subscriber don't need this module.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives
pub const LOG_ENV: &str = "RIVET_LOG";

/// Install a fmt subscriber filtered by `RIVET_LOG` (default `warn`).
///
/// Does nothing if a global subscriber is already set.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
