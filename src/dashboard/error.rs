//! Dashboard error types

use thiserror::Error;

use crate::api::ClientError;
use crate::session::SessionError;
use crate::view::RouteError;

/// Errors surfaced at the dashboard boundary
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A required field is missing or malformed; no request was sent
    #[error("{0}")]
    Validation(String),

    /// A course-management action ran without a selected course
    #[error("Please select a course first")]
    NoCourseSelected,

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl DashboardError {
    pub fn validation(message: impl Into<String>) -> Self {
        DashboardError::Validation(message.into())
    }
}

/// Result type alias for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_user_facing() {
        assert_eq!(
            DashboardError::validation("Please fill in all fields").to_string(),
            "Please fill in all fields"
        );
        assert_eq!(
            DashboardError::NoCourseSelected.to_string(),
            "Please select a course first"
        );
        assert_eq!(
            DashboardError::from(SessionError::Unauthenticated).to_string(),
            "Not logged in"
        );
    }
}
