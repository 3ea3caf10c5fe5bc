//! Client-side error taxonomy.
//!
//! Every failure surfaced by the request pipeline, the session store or a resource
//! client is a [`ClientError`]. Each variant carries a non-empty, human-readable
//! message suitable for an error banner.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Message used whenever nothing more specific can be extracted.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Comparable discriminant of a [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidCredentials,
    Unauthorized,
    Network,
    Server,
    Decode,
    Cancelled,
    Storage,
    InvalidRequest,
}

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Login rejected by the backend.
    #[error("{message}")]
    InvalidCredentials { message: String },

    /// A session that looked valid was rejected mid-use.
    #[error("{message}")]
    Unauthorized { message: String },

    /// No response was received.
    #[error("{message}")]
    Network { message: String, cause: String },

    /// A response was received with an error status.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// A successful response carried a body that could not be decoded.
    #[error("{message}")]
    Decode { message: String },

    /// The view that issued the request was left before it completed.
    #[error("Request cancelled")]
    Cancelled,

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::InvalidCredentials { .. } => ErrorKind::InvalidCredentials,
            ClientError::Unauthorized { .. } => ErrorKind::Unauthorized,
            ClientError::Network { .. } => ErrorKind::Network,
            ClientError::Server { .. } => ErrorKind::Server,
            ClientError::Decode { .. } => ErrorKind::Decode,
            ClientError::Cancelled => ErrorKind::Cancelled,
            ClientError::Storage(_) => ErrorKind::Storage,
            ClientError::InvalidRequest(_) => ErrorKind::InvalidRequest,
        }
    }

    /// The message shown to the user.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status of a server-originated error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized { .. } | ClientError::InvalidCredentials { .. } => {
                Some(StatusCode::UNAUTHORIZED.as_u16())
            }
            ClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Wrap a transport failure where no response was received.
    pub fn network(err: &reqwest::Error) -> Self {
        ClientError::Network {
            message: GENERIC_ERROR_MESSAGE.to_string(),
            cause: err.to_string(),
        }
    }

    /// Classify a non-2xx response.
    ///
    /// `auth_exempt` requests (the login call) report a 401 as
    /// [`ClientError::InvalidCredentials`] instead of [`ClientError::Unauthorized`].
    pub fn from_response(status: StatusCode, body: &str, auth_exempt: bool) -> Self {
        let message = extract_message(status, body);
        if status == StatusCode::UNAUTHORIZED {
            if auth_exempt {
                ClientError::InvalidCredentials { message }
            } else {
                ClientError::Unauthorized { message }
            }
        } else {
            ClientError::Server {
                status: status.as_u16(),
                message,
            }
        }
    }
}

/// Pick the most specific message for a server error response.
///
/// Order: a non-empty `detail` string, the `msg` entries of a validation `detail`
/// list, the status line, then [`GENERIC_ERROR_MESSAGE`].
pub fn extract_message(status: StatusCode, body: &str) -> String {
    if let Some(detail) = detail_message(body) {
        return detail;
    }

    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => GENERIC_ERROR_MESSAGE.to_string(),
    }
}

fn detail_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .filter(|msg| !msg.is_empty())
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        _ => None,
    }
}

impl From<crate::session::storage::StorageError> for ClientError {
    fn from(err: crate::session::storage::StorageError) -> Self {
        ClientError::Storage(err.to_string())
    }
}
