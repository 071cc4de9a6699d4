use clap::Parser;
use jobapply_common::config::Config;
use jobapply_common::logging::LogFormat;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Log formatter to use
    #[arg(long, value_enum, default_value_t = default_tracing_format())]
    pub tracing: TracingFormat,

    /// Interface to bind, overriding HOST
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on, overriding PORT
    #[arg(long)]
    pub port: Option<u16>,
}

impl Args {
    /// Apply command line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TracingFormat {
    /// Use pretty formatter (default in debug mode)
    Pretty,
    /// Use JSON formatter (default in release mode)
    Json,
}

impl From<TracingFormat> for LogFormat {
    fn from(format: TracingFormat) -> Self {
        match format {
            TracingFormat::Pretty => LogFormat::Pretty,
            TracingFormat::Json => LogFormat::Json,
        }
    }
}

#[cfg(debug_assertions)]
const DEFAULT_TRACING_FORMAT: TracingFormat = TracingFormat::Pretty;
#[cfg(not(debug_assertions))]
const DEFAULT_TRACING_FORMAT: TracingFormat = TracingFormat::Json;

fn default_tracing_format() -> TracingFormat {
    DEFAULT_TRACING_FORMAT
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobapply_common::testenv::EnvSnapshot;

    #[test]
    fn overrides_host_and_port() {
        let args = Args::parse_from(["jobapply-server", "--port", "9100", "--host", "127.0.0.1"]);
        let mut config = Config::from_provider(EnvSnapshot::default()).unwrap();

        args.apply(&mut config);

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9100);
    }

    #[test]
    fn keeps_config_without_overrides() {
        let args = Args::parse_from(["jobapply-server", "--tracing", "json"]);
        let mut config = Config::from_provider(EnvSnapshot::default()).unwrap();

        args.apply(&mut config);

        assert_eq!(args.tracing, TracingFormat::Json);
        assert_eq!(config.port, 8000);
    }
}
