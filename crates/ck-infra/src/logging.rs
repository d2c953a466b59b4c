//! Tracing subscriber bootstrap for hosts that embed the core.

use tracing_subscriber::EnvFilter;

/// Install a global subscriber. The filter honors `RUST_LOG`, defaulting to
/// `info` (or `debug` when `verbose` is set). Safe to call once per process;
/// a second call is a no-op.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
