//! API Error Types
//!
//! Errors produced by the gateway when talking to the backend.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when calling the backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a response (connection refused, DNS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status
    #[error("API error {status}: {}", message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// The response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Build an [`ClientError::Api`] from a status and whatever body came back
    ///
    /// The message is the body's `error` field, then its `message` field.
    pub fn from_response(status: u16, body: &Value) -> Self {
        let message = ["error", "message"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .map(str::to_string);

        ClientError::Api { status, message }
    }

    /// Message the backend supplied, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text to show the user: the server message, else `fallback`
    ///
    /// Connection failures and undecodable bodies use `network_fallback`.
    pub fn user_message<'a>(&'a self, fallback: &'a str, network_fallback: &'a str) -> &'a str {
        match self {
            ClientError::Api { message, .. } => message.as_deref().unwrap_or(fallback),
            ClientError::Network(_) | ClientError::Decode(_) => network_fallback,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Network(format!("request timed out: {}", err))
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

/// Result type for gateway calls
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_prefers_error_field() {
        let err = ClientError::from_response(400, &json!({"error": "Course full", "message": "x"}));
        assert_eq!(err.server_message(), Some("Course full"));

        let err = ClientError::from_response(401, &json!({"message": "Bad credentials"}));
        assert_eq!(err.server_message(), Some("Bad credentials"));

        let err = ClientError::from_response(500, &Value::Null);
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn test_user_message_fallbacks() {
        let err = ClientError::from_response(500, &Value::Null);
        assert_eq!(err.user_message("Enrollment failed", "Error enrolling"), "Enrollment failed");

        let err = ClientError::Network("refused".to_string());
        assert_eq!(err.user_message("Enrollment failed", "Error enrolling"), "Error enrolling");
    }

    #[test]
    fn test_display() {
        let err = ClientError::Api {
            status: 404,
            message: Some("Not found".to_string()),
        };
        assert_eq!(err.to_string(), "API error 404: Not found");
    }
}
