//! Tracing setup (M-LOG-STRUCTURED).

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};

/// Build the filter: `RUST_LOG` when set, otherwise the configured directive.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Logs go to stderr so stdout stays free for
/// rendered page output.
///
/// Returns `false` if a subscriber was already installed.
pub fn init(config: &LoggingConfig) -> bool {
    let registry = tracing_subscriber::registry().with(env_filter(config));
    match config.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()
            .is_ok(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .is_ok(),
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn logging(filter: &str) -> LoggingConfig {
        LoggingConfig {
            format: LogFormat::Pretty,
            filter: filter.to_string(),
        }
    }

    #[test]
    #[serial]
    fn configured_directive_applies_without_rust_log() {
        unsafe {
            std::env::remove_var("RUST_LOG");
        }
        assert_eq!(env_filter(&logging("page_widgets=debug")).to_string(), "page_widgets=debug");
    }

    #[test]
    #[serial]
    fn invalid_directive_falls_back() {
        unsafe {
            std::env::remove_var("RUST_LOG");
        }
        assert_eq!(env_filter(&logging("not==a==directive")).to_string(), "info");
    }

    #[test]
    #[serial]
    fn rust_log_wins_over_config() {
        unsafe {
            std::env::set_var("RUST_LOG", "warn");
        }
        let filter = env_filter(&logging("debug")).to_string();
        unsafe {
            std::env::remove_var("RUST_LOG");
        }
        assert_eq!(filter, "warn");
    }
}
