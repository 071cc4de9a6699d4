use figment::value::{Dict, Map, Value};
use figment::{Metadata, Profile, Provider};
use std::collections::BTreeMap;

/// An owned set of environment variables
///
/// As a figment provider it hands every value over as the raw string, keyed by
/// the lower-cased name. Typed fields do their own parsing, so text such as
/// `0042` or `2024` reaches string fields unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the current process environment
    ///
    /// Variables whose name or value is not valid unicode are skipped.
    pub fn from_process() -> Self {
        Self::from_vars(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Keep only the named variables
    pub fn only(mut self, keys: &[&str]) -> Self {
        self.vars.retain(|key, _| keys.contains(&key.as_str()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.vars.remove(key)
    }

    /// Add variables that are not already present; existing values win
    pub fn merge_missing<'a, I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (key, value) in vars {
            self.vars
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }
}

impl Provider for EnvSnapshot {
    fn metadata(&self) -> Metadata {
        Metadata::named("environment snapshot")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        let dict = self
            .vars
            .iter()
            .map(|(key, value)| (key.to_ascii_lowercase(), Value::from(value.clone())))
            .collect::<Dict>();
        Ok(Profile::Default.collect(dict))
    }
}
