//! Logging configuration and initialization
//!
//! Sets up the tracing subscriber used as the operational diagnostic stream.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Normalize a configured log level into a filter directive
///
/// Only the first word is considered so trailing comments in config files are
/// ignored. `warning` maps to `warn`, `critical` to `error`, and anything
/// unrecognised falls back to `info`.
pub fn normalize_level(log_level: &str) -> &'static str {
    let level = log_level
        .split_whitespace()
        .next()
        .unwrap_or("info")
        .to_lowercase();

    match level.as_str() {
        "debug" => "debug",
        "warning" | "warn" => "warn",
        "critical" | "error" => "error",
        _ => "info",
    }
}

/// Initialize the logging system with the specified level
///
/// `RUST_LOG` takes precedence over the configured level when set.
pub fn init_logging(log_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(normalize_level(log_level)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_known_levels() {
        assert_eq!(normalize_level("debug"), "debug");
        assert_eq!(normalize_level("INFO"), "info");
        assert_eq!(normalize_level("Warning"), "warn");
        assert_eq!(normalize_level("critical"), "error");
    }

    #[test]
    fn test_normalize_ignores_trailing_comment() {
        assert_eq!(normalize_level("warn   # quieter in prod"), "warn");
    }

    #[test]
    fn test_normalize_unknown_defaults_to_info() {
        assert_eq!(normalize_level("verbose"), "info");
        assert_eq!(normalize_level(""), "info");
    }
}
