//! # Structured Logging
//!
//! Subscriber initialization for binaries and tests that embed the router.
//! The library itself only emits `tracing` events; installing a subscriber is
//! left to the process owner.

use tracing::{warn, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::core::error::RouterResult;
use crate::observability::config::{LogConfig, LogFormat};

/// Map a configured level name onto a `tracing` level
pub fn parse_level(level: &str) -> RouterResult<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(crate::config_error!("Unknown log level: {}", other)),
    }
}

/// Install a global `tracing` subscriber according to `config`
///
/// `RUST_LOG` directives are honoured on top of the configured level. An
/// already installed subscriber is left in place.
pub fn init_logging(config: &LogConfig) -> RouterResult<()> {
    let level = parse_level(&config.level)?;
    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    let result = match config.format {
        LogFormat::Json => Registry::default()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init(),
        LogFormat::Text => Registry::default()
            .with(env_filter)
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .try_init(),
    };

    if result.is_err() {
        warn!("Tracing subscriber already initialized, skipping initialization");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("INFO").unwrap(), Level::INFO);
        assert_eq!(parse_level("warn").unwrap(), Level::WARN);
        assert!(parse_level("verbose").is_err());
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        let config = LogConfig {
            level: "debug".to_string(),
            format: LogFormat::Text,
        };
        assert!(init_logging(&config).is_ok());
        assert!(init_logging(&config).is_ok());
    }

    #[test]
    fn test_init_logging_rejects_unknown_level() {
        let config = LogConfig {
            level: "loud".to_string(),
            format: LogFormat::Json,
        };
        assert!(init_logging(&config).is_err());
    }
}
