/*
 * Responsibility
 * - read authority settings from the environment (AUTHORITY_PREFIX, AUTHORITY_UPPER_CASE)
 * - validate values (invalid -> error, missing -> default)
 */
use std::fmt;

use crate::services::authorities::{DEFAULT_PREFIX, DEFAULT_UPPER_CASE};

pub const PREFIX_VAR: &str = "AUTHORITY_PREFIX";
pub const UPPER_CASE_VAR: &str = "AUTHORITY_UPPER_CASE";

#[derive(Debug)]
pub enum ConfigError {
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityConfig {
    pub prefix: String,
    pub upper_case: bool,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            upper_case: DEFAULT_UPPER_CASE,
        }
    }
}

impl AuthorityConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same rules as [`AuthorityConfig::from_env`], with values taken from `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = match lookup(PREFIX_VAR) {
            Some(v) if v.trim().is_empty() => return Err(ConfigError::Invalid(PREFIX_VAR)),
            Some(v) => v.trim().to_string(),
            None => DEFAULT_PREFIX.to_string(),
        };

        let upper_case = match lookup(UPPER_CASE_VAR) {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid(UPPER_CASE_VAR))?,
            None => DEFAULT_UPPER_CASE,
        };

        Ok(Self { prefix, upper_case })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = AuthorityConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, AuthorityConfig::default());
        assert_eq!(config.prefix, "ROLE");
        assert!(config.upper_case);
    }

    #[test]
    fn test_prefix_and_case_are_read() {
        let config = AuthorityConfig::from_lookup(lookup_from(&[
            (PREFIX_VAR, " AUTH "),
            (UPPER_CASE_VAR, "No"),
        ]))
        .unwrap();

        assert_eq!(config.prefix, "AUTH");
        assert!(!config.upper_case);
    }

    #[test]
    fn test_empty_prefix_is_invalid() {
        let err = AuthorityConfig::from_lookup(lookup_from(&[(PREFIX_VAR, "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(PREFIX_VAR)));
    }

    #[test]
    fn test_unparseable_upper_case_is_invalid() {
        let err =
            AuthorityConfig::from_lookup(lookup_from(&[(UPPER_CASE_VAR, "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(UPPER_CASE_VAR)));
        assert_eq!(err.to_string(), "invalid configuration: AUTHORITY_UPPER_CASE");
    }

    #[test]
    fn test_parse_bool_accepts_common_spellings() {
        for raw in ["true", "TRUE", "1", "yes", "on"] {
            assert_eq!(parse_bool(raw), Some(true), "{raw}");
        }
        for raw in ["false", "0", "No", "off"] {
            assert_eq!(parse_bool(raw), Some(false), "{raw}");
        }
        assert_eq!(parse_bool(""), None);
    }
}
