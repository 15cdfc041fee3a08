//! Tracing setup for the CLI and tests.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Directive set for `config`. `RUST_LOG` wins over the configured level.
fn filter_for(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the process-wide subscriber described by `config`.
///
/// Returns `false` if a subscriber was already installed, in which case the
/// existing one keeps receiving events.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let builder = tracing_subscriber::fmt().with_env_filter(filter_for(config));
    let installed = if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.compact().with_target(true).try_init().is_ok()
    };

    if installed {
        tracing::debug!(level = %config.level, json = config.json, "Logging ready");
    }
    installed
}

/// Level string for the CLI verbosity flag.
pub fn level_for_verbosity(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}
