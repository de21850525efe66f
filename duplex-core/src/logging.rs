//! Tracing subscriber setup shared by the binary and tests

use tracing_subscriber::EnvFilter;

/// Environment variable consulted before `RUST_LOG`
pub const LOG_ENV_VAR: &str = "DUPLEX_LOG";

/// Resolve the filter directive: `DUPLEX_LOG`, then `RUST_LOG`, then `default_level`.
pub fn resolve_filter(default_level: &str) -> EnvFilter {
    if let Ok(directive) = std::env::var(LOG_ENV_VAR) {
        if let Ok(filter) = EnvFilter::try_new(&directive) {
            return filter;
        }
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install a fmt subscriber writing to stderr.
///
/// Returns `false` when a global subscriber was already installed, which
/// keeps repeated calls (tests, embedding applications) harmless.
pub fn init_logging(default_level: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(resolve_filter(default_level))
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        let _ = init_logging("warn");
        assert!(!init_logging("warn"));
    }

    #[test]
    fn test_resolve_filter_falls_back_to_default() {
        let filter = resolve_filter("debug");
        assert!(!filter.to_string().is_empty());
    }
}
