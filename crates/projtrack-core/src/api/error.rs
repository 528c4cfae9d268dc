use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use super::client::PendingRequest;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Session refresh failed: {0}")]
    RefreshFailed(RefreshFailure),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Truncate a response body to avoid logging excessive data
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}

impl ApiError {
    /// HTTP status of the failure, if a response was received
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http(err) => Some(err.status),
            ApiError::RefreshFailed(failure) => failure.status,
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Http(err) if err.status == StatusCode::UNAUTHORIZED)
    }

    /// True when the session is gone and the user has to sign in again
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::RefreshFailed(_))
    }

    pub fn as_http(&self) -> Option<&HttpError> {
        match self {
            ApiError::Http(err) => Some(err),
            _ => None,
        }
    }
}

/// A non-2xx response, carrying enough of the request to replay it.
#[derive(Debug, Clone)]
pub struct HttpError {
    pub status: StatusCode,
    pub body: String,
    pub request: PendingRequest,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.status.as_u16() {
            400 => "Bad request",
            401 => "Unauthorized",
            403 => "Access denied",
            404 => "Resource not found",
            429 => "Rate limited",
            500..=599 => "Server error",
            _ => "Request failed",
        };
        write!(
            f,
            "{} ({} {} -> {}): {}",
            label,
            self.request.method,
            self.request.path,
            self.status.as_u16(),
            truncate_body(&self.body)
        )
    }
}

impl std::error::Error for HttpError {}

impl HttpError {
    /// Flatten the backend's error JSON into `(field, message)` pairs.
    ///
    /// Handles `{"detail": "..."}`, `{"non_field_errors": [...]}` and
    /// per-field lists such as `{"email": ["already exists"]}`. Non-field
    /// messages are reported with an empty field name.
    pub fn validation_messages(&self) -> Vec<(String, String)> {
        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&self.body) else {
            return Vec::new();
        };

        let mut messages = Vec::new();
        for (key, value) in map {
            let field = match key.as_str() {
                "detail" | "non_field_errors" => String::new(),
                _ => key,
            };
            collect_messages(&field, &value, &mut messages);
        }
        messages
    }
}

fn collect_messages(field: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::String(s) => out.push((field.to_string(), s.clone())),
        Value::Array(items) => {
            for item in items {
                collect_messages(field, item, out);
            }
        }
        Value::Object(map) => {
            for (key, nested) in map {
                let name = if field.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", field, key)
                };
                collect_messages(&name, nested, out);
            }
        }
        other => out.push((field.to_string(), other.to_string())),
    }
}

/// Why a credential refresh failed. Cloneable so concurrent waiters on the
/// same refresh can all receive it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RefreshFailure {
    pub status: Option<StatusCode>,
    pub message: String,
}

impl From<&ApiError> for RefreshFailure {
    fn from(err: &ApiError) -> Self {
        Self {
            status: err.status(),
            message: err.to_string(),
        }
    }
}
