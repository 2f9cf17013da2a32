//! Session error types

use thiserror::Error;

/// Errors that can occur while reading or writing the stored session
#[derive(Error, Debug)]
pub enum SessionError {
    /// No complete session is stored; the user has to log in
    #[error("Not logged in")]
    Unauthenticated,

    /// I/O operation on the backing file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(err.to_string())
    }
}

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;
