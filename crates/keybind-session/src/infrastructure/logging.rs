//! Log output for hosts embedding the menu.

use tracing_subscriber::EnvFilter;

/// Installs a `tracing` subscriber that writes formatted logs to stderr.
///
/// `RUST_LOG` overrides `default_level` when set.  Returns `false` if a global
/// subscriber was already installed, which is not an error for a host that
/// configures logging itself.
pub fn init_logging(default_level: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
