//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

use crate::core::config::LoggingConfig;

/// Initialize the logging system with the default filter
pub fn init() {
    init_with(&LoggingConfig::default());
}

/// Initialize the logging system from configuration
///
/// `RUST_LOG` still takes precedence over the configured level. Calling this
/// more than once is harmless; later calls are ignored.
pub fn init_with(config: &LoggingConfig) {
    let env = env_logger::Env::default().default_filter_or(config.level.as_str());
    let mut builder = env_logger::Builder::from_env(env);
    if !config.timestamps {
        builder.format_timestamp(None);
    }
    if builder.try_init().is_err() {
        log::debug!("Logger already installed, keeping it");
    }
}
