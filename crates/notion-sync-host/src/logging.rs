use tracing_subscriber::EnvFilter;

use crate::config::LogLevel;

/// Install the global subscriber. `RUST_LOG` overrides `level`.
///
/// Only the first call takes effect; later calls are ignored so hosts and
/// tests may call it freely.
pub fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
