//! Lenient deserializers for values that arrive as environment variable strings.

use secrecy::SecretString;
use serde::Deserializer;
use serde::de::{self, SeqAccess, Visitor};
use std::fmt;

/// Parses a boolean flag from a bool, an integer (0/1) or a string such as "yes" or "off"
pub(super) fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct FlagVisitor;

    impl<'de> Visitor<'de> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a boolean flag (true/false, 1/0, yes/no, on/off)")
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<bool, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<bool, E> {
            match value {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(E::custom(format!("invalid flag value {}", value))),
            }
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<bool, E> {
            match u64::try_from(value) {
                Ok(value) => self.visit_u64(value),
                Err(_) => Err(E::custom(format!("invalid flag value {}", value))),
            }
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<bool, E> {
            match value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(true),
                "false" | "0" | "no" | "off" | "" => Ok(false),
                other => Err(E::custom(format!("invalid flag value '{}'", other))),
            }
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}

/// Parses a list of origins from a sequence or a comma separated string
///
/// Entries are trimmed, empty entries dropped and a trailing slash removed, since
/// browsers never send one in the `Origin` header.
pub(super) fn deserialize_origins<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OriginsVisitor;

    impl<'de> Visitor<'de> for OriginsVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a list of origins or a comma separated string")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            let value = value.trim();
            let value = value
                .strip_prefix('[')
                .and_then(|v| v.strip_suffix(']'))
                .unwrap_or(value);
            Ok(value.split(',').filter_map(normalize_origin).collect())
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut origins = Vec::new();
            while let Some(origin) = seq.next_element::<String>()? {
                origins.extend(normalize_origin(&origin));
            }
            Ok(origins)
        }
    }

    deserializer.deserialize_any(OriginsVisitor)
}

fn normalize_origin(raw: &str) -> Option<String> {
    let origin = raw.trim().trim_matches(|c| c == '"' || c == '\'');
    let origin = origin.trim_end_matches('/');
    (!origin.is_empty()).then(|| origin.to_string())
}

/// Parses a TCP port from a number or its decimal text
pub(super) fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    struct PortVisitor;

    impl<'de> Visitor<'de> for PortVisitor {
        type Value = u16;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a port number between 0 and 65535")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<u16, E> {
            u16::try_from(value).map_err(|_| E::custom(format!("port {} is out of range", value)))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<u16, E> {
            u16::try_from(value).map_err(|_| E::custom(format!("port {} is out of range", value)))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<u16, E> {
            value
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid port '{}'", value)))
        }
    }

    deserializer.deserialize_any(PortVisitor)
}

/// Normalizes a route prefix to "/segment" form
pub(super) fn deserialize_api_prefix<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: String = serde::Deserialize::deserialize(deserializer)?;
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(de::Error::custom("API prefix cannot be empty"));
    }
    Ok(format!("/{}", trimmed))
}

/// Parses an optional secret, treating empty strings as absent
///
/// Environment values arrive as text and are kept byte for byte, so IDs like
/// `ADZUNA_APP_ID=00123` keep their leading zeros. Numbers from other
/// providers are stored in their display form.
pub(super) fn deserialize_optional_secret<'de, D>(
    deserializer: D,
) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    struct SecretVisitor;

    impl<'de> Visitor<'de> for SecretVisitor {
        type Value = Option<SecretString>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a secret string")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            if value.is_empty() {
                return Ok(None);
            }
            Ok(Some(SecretString::from(value.to_string())))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            self.visit_str(&value.to_string())
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            self.visit_str(&value.to_string())
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            self.visit_str(&value.to_string())
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
            self.visit_str(&value.to_string())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(SecretVisitor)
}
