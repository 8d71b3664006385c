use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. Clients match on these,
// never on the human-readable message string.

/// Stable error code constants.
///
/// Clients should match on `code` from
/// `{"code": "NOT_FOUND", "error": "Issue not found", "message": "..."}`.
/// Codes never change; messages may be reworded.
pub mod error_code {
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const INVALID_ID: &str = "INVALID_ID";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

// ── ServiceError ────────────────────────────────────────────────────

/// Unified service error type used by the API layer.
///
/// Each variant maps to a stable error code (see [`error_code`]), a short
/// summary and an HTTP status code. The JSON response always includes all
/// three plus the detail message:
///
/// ```json
/// {"code": "NOT_FOUND", "error": "Issue not found", "message": "No issue found with ID: ..."}
/// ```
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Missing or malformed input fields. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// Identifier is not in the store's id format. HTTP 400.
    #[error("{0}")]
    InvalidId(String),

    /// Resource does not exist. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Storage backend failure or unavailable store. HTTP 500.
    #[error("{0}")]
    Storage(String),

    /// Unexpected internal error. HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => error_code::VALIDATION_FAILED,
            ServiceError::InvalidId(_) => error_code::INVALID_ID,
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::Storage(_) => error_code::STORAGE_ERROR,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }

    /// Short human-readable summary of the failure class.
    pub fn summary(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "Validation failed",
            ServiceError::InvalidId(_) => "Invalid ID format",
            ServiceError::NotFound(_) => "Issue not found",
            ServiceError::Storage(_) => "Storage error",
            ServiceError::Internal(_) => "Internal error",
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) | ServiceError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Storage(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "code": self.error_code(),
            "error": self.summary(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
