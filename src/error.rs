/// Unified error types for StudyShelf
use crate::api::ApiEnvelope;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Main error type for the resource server
#[derive(Error, Debug)]
pub enum ShelfError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Blob storage errors
    #[error("Blob storage error: {0}")]
    BlobStorage(String),

    /// Document store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convert ShelfError to an HTTP response
///
/// Validation and NotFound carry their message to the client verbatim;
/// everything else is logged and answered with a generic 500.
impl IntoResponse for ShelfError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ShelfError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ShelfError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            other => {
                tracing::error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(), // Don't leak details
                )
            }
        };

        let body = Json(ApiEnvelope::failure(&message));

        (status, body).into_response()
    }
}

/// Result type alias for StudyShelf operations
pub type ShelfResult<T> = Result<T, ShelfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response = ShelfError::Validation("缺少必填字段".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = ShelfError::NotFound("资源不存在".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_errors_map_to_500() {
        let response = ShelfError::Internal("pool exhausted".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ShelfError = io.into();
        assert!(matches!(err, ShelfError::Io(_)));
    }
}
