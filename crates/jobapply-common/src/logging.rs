use crate::config::Config;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::TryInitError;

/// Output format for log events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable, multi-line output
    Pretty,
    /// One JSON object per event
    Json,
}

/// Build the filter for the application's targets
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config))
}

/// Filter derived from `LOG_LEVEL` alone
///
/// Other crates stay at `warn`, except `tower_http` whose request spans follow the
/// application's level.
pub fn default_filter(config: &Config) -> EnvFilter {
    let level = &config.log_level;
    EnvFilter::new(format!(
        "warn,jobapply_server={level},jobapply_common={level},tower_http={level}"
    ))
}

/// Configure and initialize logging for the process
///
/// Fails if a global subscriber has already been installed.
pub fn setup_logging(config: &Config, format: LogFormat) -> Result<(), TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let registry = tracing_subscriber::registry().with(env_filter(config));

    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_target(true))
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_target(true),
            )
            .try_init(),
    }
}
