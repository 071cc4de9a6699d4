//! Configuration for the job application server.
//!
//! Settings are resolved once at process entry from environment variables (via
//! figment) and then shared read-only. Values reach the fields as raw strings and
//! each typed field parses its own. Any figment [`Provider`] can be used as the
//! source, which is how the test bootstrap injects placeholder values without
//! touching the process environment.

use figment::{Figment, Provider};
use fundu::{DurationParser, TimeUnit};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;

mod de;
mod snapshot;

#[cfg(test)]
mod tests;

pub use snapshot::EnvSnapshot;

use de::{
    deserialize_api_prefix, deserialize_flag, deserialize_optional_secret, deserialize_origins,
    deserialize_port,
};

/// Environment variables read into [`Config`].
///
/// Anything else in the process environment is ignored.
pub const ENV_KEYS: &[&str] = &[
    "PROJECT_NAME",
    "ENVIRONMENT",
    "DEBUG",
    "API_V1_STR",
    "BACKEND_CORS_ORIGINS",
    "HOST",
    "PORT",
    "LOG_LEVEL",
    "DATABASE_URL",
    "DATABASE_CONNECT_TIMEOUT",
    "MIGRATIONS_DIR",
    "TEMPLATE_DIR",
    "STATIC_DIR",
    "SHUTDOWN_TIMEOUT",
    "SECRET_KEY",
    "GROQ_API_KEY",
    "OPENAI_API_KEY",
    "REED_API_KEY",
    "ADZUNA_APP_ID",
    "ADZUNA_APP_KEY",
];

/// Credentials for the external services the application talks to.
///
/// None of these are required for the server to start; they are only checked by
/// the code paths that need them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiKeys {
    #[serde(default, deserialize_with = "deserialize_optional_secret")]
    pub groq_api_key: Option<SecretString>,
    #[serde(default, deserialize_with = "deserialize_optional_secret")]
    pub openai_api_key: Option<SecretString>,
    #[serde(default, deserialize_with = "deserialize_optional_secret")]
    pub reed_api_key: Option<SecretString>,
    /// Adzuna application ID (numeric IDs are accepted and kept as text)
    #[serde(default, deserialize_with = "deserialize_optional_secret")]
    pub adzuna_app_id: Option<SecretString>,
    #[serde(default, deserialize_with = "deserialize_optional_secret")]
    pub adzuna_app_key: Option<SecretString>,
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Human readable project name, shown on the landing page
    #[serde(default = "default_project_name")]
    pub project_name: String,
    /// Deployment environment name, e.g. "development" or "production"
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Debug flag
    ///
    /// Accepts booleans as well as "1"/"0", "yes"/"no" and "on"/"off".
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub debug: bool,
    /// Prefix the versioned API is mounted under
    ///
    /// Always starts with a slash and never ends with one.
    #[serde(default = "default_api_v1_str", deserialize_with = "deserialize_api_prefix")]
    pub api_v1_str: String,
    /// Origins allowed to make credentialed cross-origin requests
    ///
    /// Accepts a list or a comma separated string. "*" allows any origin.
    #[serde(
        default = "default_cors_origins",
        deserialize_with = "deserialize_origins"
    )]
    pub backend_cors_origins: Vec<String>,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port", deserialize_with = "deserialize_port")]
    pub port: u16,
    /// Log level for the application's own targets
    ///
    /// e.g. "debug" would be similar to "warn,jobapply_server=debug,..."
    ///
    /// Valid values are: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Database connection URL; the server runs degraded without one
    #[serde(default, deserialize_with = "deserialize_optional_secret")]
    pub database_url: Option<SecretString>,
    /// Upper bound for the startup connectivity check
    #[serde(
        default = "default_database_connect_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub database_connect_timeout: Duration,
    /// Directory of SQL migrations applied during schema initialization
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: PathBuf,
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    /// How long in-flight requests may drain after a shutdown signal
    ///
    /// Accepts both numeric values (seconds) and duration strings
    #[serde(
        default = "default_shutdown_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub shutdown_timeout: Duration,
    #[serde(default, deserialize_with = "deserialize_optional_secret")]
    pub secret_key: Option<SecretString>,
    #[serde(flatten)]
    pub api_keys: ApiKeys,
}

impl Config {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self, figment::Error> {
        Self::from_provider(EnvSnapshot::from_process().only(ENV_KEYS))
    }

    /// Load configuration from an arbitrary figment provider
    pub fn from_provider<P: Provider>(provider: P) -> Result<Self, figment::Error> {
        Figment::new().merge(provider).extract()
    }

    /// Location of the generated OpenAPI document
    pub fn openapi_url(&self) -> String {
        format!("{}/openapi.json", self.api_v1_str)
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

fn default_project_name() -> String {
    "Job Application System".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_api_v1_str() -> String {
    "/api/v1".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:8000".to_string(),
    ]
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_database_connect_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_migrations_dir() -> PathBuf {
    PathBuf::from("migrations")
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("app/templates")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("app/static")
}

/// Default shutdown timeout of 8 seconds
fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(8)
}

/// Duration parser with seconds as the default unit
///
/// Supports seconds (s), milliseconds (ms) and minutes (m), optionally separated
/// from the number by whitespace. Multiple values are summed ("1m 10s" = 70s).
/// Fractions, exponents and infinity are rejected.
const DURATION_PARSER: DurationParser<'static> = DurationParser::builder()
    .time_units(&[TimeUnit::Second, TimeUnit::MilliSecond, TimeUnit::Minute])
    .parse_multiple(None)
    .allow_time_unit_delimiter()
    .disable_infinity()
    .disable_fraction()
    .disable_exponent()
    .default_unit(TimeUnit::Second)
    .build();

/// Accepts unsigned/signed integers (seconds) or strings understood by [`DURATION_PARSER`]
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Visitor;

    struct DurationVisitor;

    impl<'de> Visitor<'de> for DurationVisitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a duration string or number of seconds")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            DURATION_PARSER
                .parse(value)
                .map_err(|e| {
                    E::custom(format!(
                        "invalid duration '{}': {}. Examples: '5' (5 seconds), '500ms', '30s', '2m'",
                        value, e
                    ))
                })?
                .try_into()
                .map_err(|e| E::custom(format!("duration conversion error: {}", e)))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Duration::from_secs(value))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            u64::try_from(value)
                .map(Duration::from_secs)
                .map_err(|_| E::custom("duration cannot be negative"))
        }
    }

    deserializer.deserialize_any(DurationVisitor)
}
