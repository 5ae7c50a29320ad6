use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;

use crate::config::{LogFormat, LoggingConfig};

/// Builds the filter: `RUST_LOG` when set and valid, the configured level otherwise.
fn build_filter(cfg: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber, writing to stderr.
///
/// Calling it again is a no-op, so tests and embedders may initialize freely.
pub fn init_logging(cfg: &LoggingConfig) {
    let filter = build_filter(cfg);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_timer(UtcTime::rfc_3339())
        .with_target(true);

    let result = match cfg.format {
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    if result.is_err() {
        tracing::debug!("Global tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_falls_back() {
        let cfg = LoggingConfig {
            level: "app=verbose".to_owned(),
            ..LoggingConfig::default()
        };
        let filter = temp_env::with_var_unset("RUST_LOG", || build_filter(&cfg));
        assert_eq!(filter.to_string(), "info");
    }

    #[test]
    fn test_configured_level_is_used() {
        let cfg = LoggingConfig {
            level: "equation_solver=debug".to_owned(),
            ..LoggingConfig::default()
        };
        let filter = temp_env::with_var_unset("RUST_LOG", || build_filter(&cfg));
        assert_eq!(filter.to_string(), "equation_solver=debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(&LoggingConfig::default());
        init_logging(&LoggingConfig {
            format: LogFormat::Json,
            ..LoggingConfig::default()
        });
    }
}
