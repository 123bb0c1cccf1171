//! Diagnostic logging for the `uno` binary.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

/// Default filter when `RUST_LOG` is unset: quiet, except round results.
pub const DEFAULT_FILTER: &str = "warn,uno_engine=info";

/// Install a stderr subscriber filtered by `RUST_LOG`.
///
/// Returns `false` when a global subscriber was already set, e.g. by a test
/// harness; logging then goes to that subscriber instead.
pub fn init_logging() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).is_ok()
}
