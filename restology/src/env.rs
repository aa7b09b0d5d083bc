//! Environment-based configuration helpers.

use std::str::FromStr;

/// An error that can occur when reading options from the environment.
#[derive(Debug, thiserror::Error)]
pub enum FromEnvError {
    /// An environment variable was not unicode.
    #[error("environment variable {name} was not unicode")]
    NotUnicode {
        /// The name of the environment variable.
        name: &'static str,
    },

    /// An environment variable could not be parsed.
    #[error("failed to parse environment variable {name} (was `{value}`): {reason}")]
    Invalid {
        /// The name of the environment variable.
        name: &'static str,

        /// The value that was attempted to be parsed.
        value: String,

        /// Why the value is invalid.
        reason: String,
    },
}

/// Read an environment variable, treating empty values as unset.
pub(crate) fn var(name: &'static str) -> Result<Option<String>, FromEnvError> {
    match std::env::var(name) {
        Ok(value) => Ok(if value.is_empty() { None } else { Some(value) }),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(FromEnvError::NotUnicode { name }),
    }
}

/// Read and parse an environment variable.
pub(crate) fn parse_var<T>(name: &'static str) -> Result<Option<T>, FromEnvError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    var(name)?
        .map(|value| {
            value.parse().map_err(|err: T::Err| FromEnvError::Invalid {
                name,
                reason: err.to_string(),
                value,
            })
        })
        .transpose()
}

/// A boolean flag, as read from the environment.
///
/// Accepts `true`/`false`, `1`/`0`, `yes`/`no` and `on`/`off`, case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Flag(pub bool);

impl FromStr for Flag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Self(true)),
            "false" | "0" | "no" | "off" => Ok(Self(false)),
            _ => Err(format!("`{s}` is not a boolean")),
        }
    }
}
