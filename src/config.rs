//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:8001";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DATA_DIR_NAME: &str = ".expense-advisor";

/// Errors produced while building [`ClientConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The API URL is not an absolute `http`/`https` URL.
    #[error("invalid API URL {0:?}: expected http:// or https://")]
    InvalidApiUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash.
    pub api_url: String,
    /// Directory holding persisted client state (the token file).
    pub data_dir: PathBuf,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `EXPENSE_API_URL`: default `http://localhost:8001`
    /// - `EXPENSE_DATA_DIR`: default `~/.expense-advisor`
    /// - `EXPENSE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `EXPENSE_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if `EXPENSE_API_URL` is not an http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the API URL is not an http(s) URL.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = normalize_api_url(
            lookup("EXPENSE_API_URL")
                .as_deref()
                .unwrap_or(DEFAULT_API_URL),
        )?;
        let data_dir = lookup("EXPENSE_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map_or_else(default_data_dir, PathBuf::from);
        let timeouts = Timeouts {
            request_secs: parse_secs(
                lookup("EXPENSE_REQUEST_TIMEOUT_SECS"),
                DEFAULT_REQUEST_TIMEOUT_SECS,
            ),
            connect_secs: parse_secs(
                lookup("EXPENSE_CONNECT_TIMEOUT_SECS"),
                DEFAULT_CONNECT_TIMEOUT_SECS,
            ),
        };

        Ok(Self { api_url, data_dir, timeouts })
    }
}

/// Trim whitespace and trailing slashes, and require an http(s) scheme.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidApiUrl`] for anything else.
pub fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .is_some_and(|rest| !rest.is_empty());
    if !has_host {
        return Err(ConfigError::InvalidApiUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

/// Lookup answering from `overrides` first, then from `fallback`.
///
/// Used to let command-line flags win over environment variables before
/// anything is validated.
pub fn layered_lookup<'a>(
    overrides: &'a [(&'a str, String)],
    fallback: impl Fn(&str) -> Option<String> + 'a,
) -> impl Fn(&str) -> Option<String> + 'a {
    move |key| {
        overrides
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.clone())
            .or_else(|| fallback(key))
    }
}

/// `~/.expense-advisor`; without a home directory, under the working
/// directory (or the temp dir). Always absolute.
fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(std::env::temp_dir)
        .join(DATA_DIR_NAME)
}

fn parse_secs(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
