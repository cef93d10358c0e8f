use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding an explicit tracing filter, e.g. `polar_cli=trace`.
pub const LOG_ENV: &str = "POLAR_LOG";

/// Filter used when `POLAR_LOG` is not set.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

/// Install the global subscriber. Logs go to stderr so structured stdout
/// output stays parseable.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // A subscriber may already be installed when running inside tests.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(true), "debug");
        assert_eq!(default_filter(false), "warn");
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging(false);
        init_logging(true);
    }
}
