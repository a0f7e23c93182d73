//! Typed environment variable access
//!
//! Unset or blank variables read as `None`; a value that is present but
//! malformed is an error rather than a silent fallback.

use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// A present but unusable environment value
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid value for {key}: '{value}' ({reason})")]
pub struct EnvError {
    /// Variable name
    pub key: String,
    /// Raw value
    pub value: String,
    /// Parse failure
    pub reason: String,
}

/// Non-blank string value of `key`
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse `key` into `T`
pub fn env_parse<T>(key: &str) -> Result<Option<T>, EnvError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_string(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| EnvError {
                key: key.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

/// Parse `key` as a whole number of seconds
pub fn env_duration_secs(key: &str) -> Result<Option<Duration>, EnvError> {
    Ok(env_parse::<u64>(key)?.map(Duration::from_secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names; tests run in parallel.

    #[test]
    fn test_unset_and_blank_are_none() {
        // SAFETY: variable names are unique to this test
        unsafe {
            std::env::remove_var("AGENT_UTILS_TEST_UNSET");
            std::env::set_var("AGENT_UTILS_TEST_BLANK", "   ");
        }
        assert_eq!(env_string("AGENT_UTILS_TEST_UNSET"), None);
        assert_eq!(env_parse::<u32>("AGENT_UTILS_TEST_BLANK"), Ok(None));
    }

    #[test]
    fn test_parse_values() {
        // SAFETY: variable names are unique to this test
        unsafe {
            std::env::set_var("AGENT_UTILS_TEST_NUM", " 42 ");
            std::env::set_var("AGENT_UTILS_TEST_SECS", "30");
        }
        assert_eq!(env_parse::<u32>("AGENT_UTILS_TEST_NUM"), Ok(Some(42)));
        assert_eq!(
            env_duration_secs("AGENT_UTILS_TEST_SECS"),
            Ok(Some(Duration::from_secs(30)))
        );
    }

    #[test]
    fn test_malformed_value_is_error() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("AGENT_UTILS_TEST_BAD", "ten");
        }
        let err = env_parse::<u32>("AGENT_UTILS_TEST_BAD").unwrap_err();
        assert_eq!(err.key, "AGENT_UTILS_TEST_BAD");
        assert_eq!(err.value, "ten");
    }
}
