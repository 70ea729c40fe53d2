/// Error handling for the API server
///
/// A single error type that every handler returns, mapped to HTTP responses
/// by its `IntoResponse` impl. Library errors (`AuthError`, `TaskError`)
/// convert in via `From`, so handlers stay on `?`.
///
/// The taxonomy follows the service's contract: validation problems
/// (duplicate email, bad credentials, malformed fields) are 400,
/// authorization problems (missing/invalid token, wrong owner) are 403,
/// missing records are 404, and anything else is a 500 whose details are
/// logged server-side but never echoed to the client.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use taskboard_shared::{auth::AuthError, tasks::TaskError};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) - validation failures, duplicate email, bad credentials
    BadRequest(String),

    /// Forbidden (403) - missing/invalid token or wrong owner
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Field-level validation errors (400)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g. "bad_request", "forbidden")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log the details, hand the client a generic message
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert auth service errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateEmail | AuthError::InvalidCredentials => {
                ApiError::BadRequest(err.to_string())
            }
            AuthError::MissingToken => ApiError::Forbidden("Access denied".to_string()),
            AuthError::InvalidToken(_) => ApiError::Forbidden("Invalid token".to_string()),
            AuthError::TokenCreation(e) => {
                ApiError::InternalError(format!("Token creation failed: {}", e))
            }
            AuthError::Password(e) => {
                ApiError::InternalError(format!("Password operation failed: {}", e))
            }
            AuthError::Database(e) => ApiError::InternalError(format!("Database error: {}", e)),
        }
    }
}

/// Convert task service errors to API errors
impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound => ApiError::NotFound("Task not found".to_string()),
            TaskError::Forbidden => ApiError::Forbidden("Unauthorized".to_string()),
            TaskError::Database(e) => ApiError::InternalError(format!("Database error: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");
    }

    #[test]
    fn test_duplicate_email_maps_to_bad_request() {
        let err: ApiError = AuthError::DuplicateEmail.into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_missing_token_maps_to_forbidden() {
        let err: ApiError = AuthError::MissingToken.into();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn test_task_errors_map_to_statuses() {
        assert!(matches!(
            ApiError::from(TaskError::NotFound),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(TaskError::Forbidden),
            ApiError::Forbidden(_)
        ));
    }
}
