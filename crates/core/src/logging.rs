//! Logging setup
//!
//! The gateway logs through `tracing`. Embedding applications that install
//! their own subscriber can skip [`init`]; everything still goes through
//! whatever subscriber is active.

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::CoreConfig;

/// Build the filter used by [`init`]
///
/// `RUST_LOG` wins, then `log_filter` from the config, then `debug` or
/// `info` depending on the `debug` flag. An unparsable `log_filter` is
/// returned as an error.
pub fn filter_for(config: &CoreConfig) -> Result<EnvFilter, ParseError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    match &config.log_filter {
        Some(directive) => EnvFilter::try_new(directive),
        None => Ok(EnvFilter::new(config.default_log_filter())),
    }
}

/// Install a `fmt` subscriber for the process
///
/// An invalid `log_filter` falls back to the default filter and is reported
/// through the new subscriber. Returns `false` when a global subscriber was
/// already set.
pub fn init(config: &CoreConfig) -> bool {
    let (filter, invalid) = match filter_for(config) {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new(config.default_log_filter()), Some(e)),
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if let Some(e) = invalid {
        tracing::warn!(
            "Invalid log_filter {:?}, using {:?}: {}",
            config.log_filter.as_deref().unwrap_or_default(),
            config.default_log_filter(),
            e
        );
    }

    installed
}
