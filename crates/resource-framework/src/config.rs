//! # Runtime Configuration
//!
//! Settings the framework itself needs, read from environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `CALLBACK_TIMEOUT_SECS` | `30` | Timeout of the callback `PUT` |
//! | `LOG_FORMAT` | `json`, or `compact` on a terminal | Log line format |
//!
//! Log levels are controlled separately through `RUST_LOG`.

use std::io::IsTerminal;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CALLBACK_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {0}: expected {1}")]
    Invalid(&'static str, &'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Compact,
}

impl LogFormat {
    /// JSON for log collectors, compact when a human is watching.
    pub fn detect() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Compact
        } else {
            Self::Json
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(ConfigError::Invalid("LOG_FORMAT", "json or compact")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub callback_timeout: Duration,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            callback_timeout: DEFAULT_CALLBACK_TIMEOUT,
            log_format: LogFormat::detect(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let callback_timeout = match get("CALLBACK_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid(
                    "CALLBACK_TIMEOUT_SECS",
                    "a positive number of seconds",
                ))?,
            None => DEFAULT_CALLBACK_TIMEOUT,
        };

        let log_format = match get("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => LogFormat::detect(),
        };

        Ok(Self {
            callback_timeout,
            log_format,
        })
    }
}
