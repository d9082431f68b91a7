use tracing_subscriber::EnvFilter;

use crate::config::ArecConfig;

/// Fallback filter when neither `RUST_LOG` nor `arec.log.filter` is set.
pub const DEFAULT_FILTER: &str = "info";

/// Install a global `fmt` subscriber.
///
/// `RUST_LOG` wins over `fallback`. Returns `false` when a global subscriber
/// was already installed (common in tests), in which case nothing changes.
pub fn init_tracing(fallback: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Install the subscriber using the `arec.log.filter` key.
pub fn init_tracing_from_config(config: &ArecConfig) -> bool {
    let filter = config
        .get_or("arec.log.filter", DEFAULT_FILTER.to_string())
        .unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    init_tracing(&filter)
}
