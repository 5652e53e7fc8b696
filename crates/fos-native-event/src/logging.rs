//! Diagnostic logging setup

use crate::config::NativeEventConfig;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber filtered at the configured level.
///
/// Returns false when a subscriber was already installed; the existing one
/// stays in place.
pub fn init(config: &NativeEventConfig) -> bool {
    let level = LevelFilter::from(config.debug_log_level);
    let filter = EnvFilter::default().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
