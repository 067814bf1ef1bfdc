// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all possible failures
/// Each variant maps to an HTTP status code and the platform error envelope
#[derive(Error, Debug)]
pub enum ReviewsError {
    #[error("{0}")]
    Validation(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Precondition on an external record failed (e.g. booking not completed)
    #[error("{0}")]
    InvalidState(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Upstream service error: {0}")]
    ExternalApi(String),
}

/// Convert ReviewsError to HTTP response
/// DOCUMENTATION: Maps error types to status codes and the
/// `{success, message, statusCode}` JSON body consumed by platform clients
impl ResponseError for ReviewsError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let body = json!({
            "success": false,
            "message": self.to_string(),
            "statusCode": status.as_u16()
        });

        HttpResponse::build(status).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ReviewsError::Validation(_) => StatusCode::BAD_REQUEST,
            ReviewsError::InvalidState(_) => StatusCode::BAD_REQUEST,
            ReviewsError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ReviewsError::Forbidden(_) => StatusCode::FORBIDDEN,
            ReviewsError::NotFound(_) => StatusCode::NOT_FOUND,
            ReviewsError::Conflict(_) => StatusCode::CONFLICT,
            ReviewsError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ReviewsError::ExternalApi(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ReviewsError::Validation("bad rating".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ReviewsError::InvalidState("booking not completed".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ReviewsError::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ReviewsError::Forbidden("not your review".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ReviewsError::NotFound("review".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ReviewsError::Conflict("duplicate".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ReviewsError::ExternalApi("timeout".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_message_passthrough() {
        let err = ReviewsError::Conflict("Review already exists for this booking".into());
        assert_eq!(err.to_string(), "Review already exists for this booking");
    }
}
