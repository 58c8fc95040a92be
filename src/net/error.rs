//! API client errors.

use serde_json::Value;

use crate::storage::StorageError;

/// Errors produced by backend calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered 401. The persisted token has already been evicted.
    #[error("not authenticated{}", detail_suffix(.detail))]
    Unauthorized { detail: Option<String> },

    /// The backend answered with another non-success status.
    #[error("server returned status {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },

    /// The response body did not match the expected shape.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// The backend's `detail` message, when the error body carried one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { detail } | Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

/// Extract the human-readable error from a FastAPI-style error body.
///
/// `{"detail": "..."}` yields the string; validation errors
/// (`{"detail": [{"msg": ...}, ...]}`) yield the messages joined by `"; "`.
/// Bodies without a usable `detail` (plain text, HTML, other JSON) yield
/// `None`.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(body).ok()?;
    let detail = match value.get("detail")? {
        Value::String(detail) => detail.trim().to_owned(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.get("msg").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("; "),
        Value::Null => return None,
        other => other.to_string(),
    };
    Some(detail).filter(|d| !d.is_empty())
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
