//! Environment bootstrap for tests.
//!
//! Tests never mutate the process environment. Instead they build an
//! [`EnvSnapshot`]: the process variables, plus anything from `.env.test` (or
//! `.env`) that is not already set, plus placeholder values for the credentials
//! that code under test checks for. The snapshot is a figment provider, so a
//! [`Config`] can be built straight from it.
//!
//! Placeholders only make "is this configured?" checks pass. They are not valid
//! credentials for any real service.

pub use crate::config::EnvSnapshot;

use crate::config::{Config, ENV_KEYS};
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Variables that must be non-empty before any test body runs
pub const REQUIRED_KEYS: [&str; 7] = [
    "DATABASE_URL",
    "SECRET_KEY",
    "GROQ_API_KEY",
    "OPENAI_API_KEY",
    "REED_API_KEY",
    "ADZUNA_APP_ID",
    "ADZUNA_APP_KEY",
];

/// Value substituted for unset required variables
pub const PLACEHOLDER: &str = "dummy";

const TEST_ENV_FILE: &str = ".env.test";
const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Debug, Error)]
pub enum EnvFileError {
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// Variables read from an env file, along with where they came from
#[derive(Debug, Clone, Default)]
pub struct EnvFile {
    pub path: Option<PathBuf>,
    pub vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Fill every missing or empty [`REQUIRED_KEYS`] entry with [`PLACEHOLDER`]
    ///
    /// Returns the names that were filled, in [`REQUIRED_KEYS`] order.
    pub fn ensure_required(&mut self) -> Vec<&'static str> {
        let mut filled = Vec::new();
        for key in REQUIRED_KEYS {
            let missing = self.get(key).is_none_or(str::is_empty);
            if missing {
                self.set(key, PLACEHOLDER);
                filled.push(key);
            }
        }
        filled
    }
}

/// Read `root/.env.test` if it exists, otherwise `root/.env`
///
/// The process environment is left untouched. Absent files yield an empty
/// [`EnvFile`].
pub fn load_env_file(root: &Path) -> Result<EnvFile, EnvFileError> {
    let Some(path) = [TEST_ENV_FILE, DEFAULT_ENV_FILE]
        .into_iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
    else {
        return Ok(EnvFile::default());
    };

    let parse_err = |source: dotenvy::Error| EnvFileError::Parse {
        path: path.clone(),
        source,
    };

    let mut vars = BTreeMap::new();
    for item in dotenvy::from_path_iter(&path).map_err(parse_err)? {
        let (key, value) = item.map_err(parse_err)?;
        vars.insert(key, value);
    }

    debug!(path = %path.display(), count = vars.len(), "loaded env file");
    Ok(EnvFile {
        path: Some(path),
        vars,
    })
}

/// Repository root, where `.env` and `.env.test` live
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// Env file variables under `root`, with a malformed file reported and treated as absent
pub fn session_env_from(root: &Path) -> EnvFile {
    load_env_file(root).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable env file");
        EnvFile::default()
    })
}

/// Env file variables for the whole test process, read once from [`workspace_root`]
pub fn session_env() -> &'static EnvFile {
    static SESSION_ENV: OnceCell<EnvFile> = OnceCell::new();

    SESSION_ENV.get_or_init(|| session_env_from(&workspace_root()))
}

/// Environment for a single test: process variables, session env file, then placeholders
pub fn test_snapshot() -> EnvSnapshot {
    let mut snapshot = EnvSnapshot::from_process();
    snapshot.merge_missing(&session_env().vars);
    snapshot.ensure_required();
    snapshot
}

/// [`Config`] built from [`test_snapshot`], reading the same keys as [`Config::load`]
pub fn test_config() -> Result<Config, figment::Error> {
    Config::from_provider(test_snapshot().only(ENV_KEYS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::fs;

    fn real_looking() -> EnvSnapshot {
        EnvSnapshot::from_vars([
            ("DATABASE_URL", "postgres://app:pw@db.internal/jobs"),
            ("SECRET_KEY", "s3cr3t"),
            ("OPENAI_API_KEY", "sk-live-123"),
            ("REED_API_KEY", "reed-abc"),
            ("ADZUNA_APP_ID", "4242"),
            ("ADZUNA_APP_KEY", "adz-key"),
        ])
    }

    #[test]
    fn fills_only_missing_required_keys() {
        let mut snapshot = real_looking();
        let before = snapshot.clone();

        let filled = snapshot.ensure_required();

        assert_eq!(filled, vec!["GROQ_API_KEY"]);
        assert_eq!(snapshot.get("GROQ_API_KEY"), Some(PLACEHOLDER));
        for key in REQUIRED_KEYS.iter().filter(|k| **k != "GROQ_API_KEY") {
            assert_eq!(snapshot.get(key), before.get(key), "{key} changed");
        }
    }

    #[test]
    fn empty_values_count_as_missing() {
        let mut snapshot = real_looking();
        snapshot.set("SECRET_KEY", "");

        let filled = snapshot.ensure_required();

        assert_eq!(filled, vec!["SECRET_KEY", "GROQ_API_KEY"]);
        assert_eq!(snapshot.get("SECRET_KEY"), Some(PLACEHOLDER));
    }

    #[test]
    fn every_required_key_is_non_empty_afterwards() {
        let mut snapshot = EnvSnapshot::default();
        assert_eq!(snapshot.ensure_required().len(), REQUIRED_KEYS.len());
        for key in REQUIRED_KEYS {
            assert!(snapshot.get(key).is_some_and(|v| !v.is_empty()));
        }
    }

    #[test]
    fn env_file_does_not_override_existing_values() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".env.test"), "FOO=fromfile\nBAR=fromfile\n").unwrap();

        let file = load_env_file(dir.path()).unwrap();
        let mut snapshot = EnvSnapshot::from_vars([("FOO", "real")]);
        snapshot.merge_missing(&file.vars);

        assert_eq!(snapshot.get("FOO"), Some("real"));
        assert_eq!(snapshot.get("BAR"), Some("fromfile"));
    }

    #[test]
    fn prefers_test_env_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".env"), "SOURCE=default\n").unwrap();
        fs::write(dir.path().join(".env.test"), "SOURCE=test\n").unwrap();

        let file = load_env_file(dir.path()).unwrap();

        assert_eq!(file.path, Some(dir.path().join(".env.test")));
        assert_eq!(file.vars.get("SOURCE").map(String::as_str), Some("test"));
    }

    #[test]
    fn falls_back_to_default_env_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".env"), "SOURCE=default\n").unwrap();

        let file = load_env_file(dir.path()).unwrap();

        assert_eq!(file.vars.get("SOURCE").map(String::as_str), Some("default"));
    }

    #[test]
    fn malformed_env_file_is_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".env.test"), "GOOD=1\nBROKEN=\"unterminated\n").unwrap();

        assert!(matches!(
            load_env_file(dir.path()),
            Err(EnvFileError::Parse { .. })
        ));

        let file = session_env_from(dir.path());
        assert!(file.path.is_none());
        assert!(file.vars.is_empty());
    }

    #[test]
    fn missing_env_files_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let file = load_env_file(dir.path()).unwrap();
        assert!(file.path.is_none());
        assert!(file.vars.is_empty());
    }

    #[test]
    fn snapshot_feeds_config() {
        let mut snapshot = EnvSnapshot::from_vars([("ENVIRONMENT", "test"), ("DEBUG", "true")]);
        snapshot.ensure_required();

        let config = Config::from_provider(snapshot).unwrap();

        assert_eq!(config.environment, "test");
        assert!(config.debug);
        let groq = config.api_keys.groq_api_key.expect("placeholder set");
        assert_eq!(groq.expose_secret(), PLACEHOLDER);
    }

    #[test]
    fn test_config_has_all_credentials() {
        let config = test_config().unwrap();
        assert!(config.database_url.is_some());
        assert!(config.secret_key.is_some());
        assert!(config.api_keys.groq_api_key.is_some());
        assert!(config.api_keys.openai_api_key.is_some());
        assert!(config.api_keys.reed_api_key.is_some());
        assert!(config.api_keys.adzuna_app_id.is_some());
        assert!(config.api_keys.adzuna_app_key.is_some());
    }
}
