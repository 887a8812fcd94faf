// Logging module for structured logging using the tracing crate

use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::config::LoggingConfig;

/// Initialize the tracing subscriber for structured logging
///
/// The subscriber is configured with:
/// - JSON lines or human-readable text, per `config.json`
/// - Filtering from `RUST_LOG` when set, otherwise `config.level`
/// - Output to stderr, keeping stdout free for command output
///
/// Calling it again after a subscriber is installed is a no-op.
///
/// # Errors
///
/// Returns an error if `config.level` is not a valid filter directive.
///
/// # Examples
///
/// ```
/// use imagepress::config::LoggingConfig;
/// use imagepress::logging::init_subscriber;
///
/// init_subscriber(&LoggingConfig::default()).expect("Failed to initialize logging");
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber(config: &LoggingConfig) -> Result<(), String> {
    let filter = build_filter(config)?;

    let result = if config.json {
        Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        Registry::default()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };

    // A subscriber installed earlier (tests, embedding applications) wins
    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }

    Ok(())
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, String> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| format!("Invalid log level '{}': {}", config.level, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_subscriber_is_idempotent() {
        let config = LoggingConfig::default();
        assert!(init_subscriber(&config).is_ok());
        assert!(init_subscriber(&config).is_ok());

        let json = LoggingConfig {
            json: true,
            ..LoggingConfig::default()
        };
        assert!(init_subscriber(&json).is_ok());
    }

    #[test]
    fn test_build_filter_accepts_directives() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = LoggingConfig {
            level: "imagepress=debug,warn".to_string(),
            json: false,
        };
        assert!(build_filter(&config).is_ok());
    }

    #[test]
    fn test_build_filter_rejects_garbage() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = LoggingConfig {
            level: "imagepress=notalevel".to_string(),
            json: false,
        };
        assert!(build_filter(&config).is_err());
    }
}
