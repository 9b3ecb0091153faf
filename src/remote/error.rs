//! Translation of HTTP failures into [`NoteError`]s.
//!
//! The note service reports failures as `{"message": "..."}`, sometimes with
//! an `error` key beside it. The message is what the user should see; when the
//! body carries neither we fall back to the status code.

use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::NoteError;

/// Shown when the request never got an answer.
pub const NO_RESPONSE_MESSAGE: &str = "No response from server. Please check your connection.";

/// A failed call to the note service.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code, when the server answered at all
    pub status: Option<StatusCode>,
    /// Human-readable error message
    pub message: String,
}

/// Error payload. Express-style handlers often send both keys, and `error`
/// is sometimes an object rather than a string.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        [self.message, self.error]
            .into_iter()
            .flatten()
            .filter_map(|value| value.as_str().map(|m| m.trim().to_string()))
            .find(|m| !m.is_empty())
    }
}

impl ApiError {
    /// The request failed before a response arrived, or the response body
    /// could not be read.
    pub fn transport(error: reqwest::Error) -> Self {
        tracing::warn!("note service request failed: {error}");

        if let Some(status) = error.status() {
            return Self::from_response(status, "");
        }

        let message = if error.is_connect() || error.is_timeout() || error.is_request() {
            NO_RESPONSE_MESSAGE.to_string()
        } else {
            format!("Request failed: {error}")
        };

        Self {
            status: None,
            message,
        }
    }

    /// The server answered with a non-success status.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let server_message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(ErrorBody::into_message);

        Self {
            status: Some(status),
            message: server_message
                .unwrap_or_else(|| format!("Server error: {}", status.as_u16())),
        }
    }

    /// Whether the same request could succeed if the user tries again.
    pub fn is_transient(&self) -> bool {
        match self.status {
            Some(status) => status.is_server_error(),
            None => true,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<ApiError> for NoteError {
    fn from(error: ApiError) -> Self {
        match error.status {
            Some(status) => NoteError::Server {
                status: status.as_u16(),
                message: error.message,
            },
            None => NoteError::Network(error.message),
        }
    }
}
