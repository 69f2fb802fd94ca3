//! Error types for the message service
//!
//! Provides unified error handling using thiserror. The cache itself has no
//! error surface; these cover request validation and statement execution.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == App Error Enum ==
/// Unified error type for the query layer and HTTP handlers.
#[derive(Error, Debug)]
pub enum AppError {
    /// One or more request fields failed validation
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Request body is not a JSON object
    #[error("Invalid request body")]
    InvalidBody,

    /// The executor does not know this statement
    #[error("Unsupported statement: {0}")]
    UnsupportedStatement(String),

    /// Statement parameters do not match the statement
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, json!({ "errors": errors }))
            }
            AppError::InvalidBody => (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() })),
            AppError::UnsupportedStatement(_)
            | AppError::InvalidParams(_)
            | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "message": "Operation failed",
                    "error": self.to_string()
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the message service.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_status() {
        let response = AppError::Validation(vec!["Invalid name".to_string()]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_status() {
        let response = AppError::UnsupportedStatement("DROP TABLE".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_display_lists_fields() {
        let err = AppError::Validation(vec!["Invalid name".into(), "Invalid email".into()]);
        assert_eq!(err.to_string(), "Validation failed: Invalid name, Invalid email");
    }
}
