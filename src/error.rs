// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        errors: Vec<String>,
    },
    /// Uniqueness violation or non-empty-category delete. The reference API
    /// surfaces these as 400, not 409.
    Conflict(String),
    /// Foreign key does not resolve within the owner's scope.
    InvalidReference(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::Conflict(_) => 400,
            ApiError::InvalidReference(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::InternalServerError(_) => 500,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::Conflict(msg) => msg,
            ApiError::InvalidReference(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InvalidReference(_) => "INVALID_REFERENCE",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::ValidationError { message, errors } => {
                json!({
                    "success": false,
                    "message": message,
                    "code": "VALIDATION_ERROR",
                    "errors": errors,
                })
            }
            _ => {
                json!({
                    "success": false,
                    "message": self.message(),
                    "code": self.error_code(),
                })
            }
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(message: impl Into<String>, errors: Vec<String>) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            errors,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn invalid_reference(message: impl Into<String>) -> Self {
        ApiError::InvalidReference(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

// Convert other error types to ApiError
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::not_found("Record not found"),
            sqlx::Error::Database(db_err)
                if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                ApiError::conflict("A record with this name already exists")
            }
            other => {
                // Log the real error but return a generic message
                tracing::error!("database error: {}", other);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<crate::auth::JwtError> for ApiError {
    fn from(err: crate::auth::JwtError) -> Self {
        tracing::error!("token issuance failed: {}", err);
        ApiError::internal_server_error("Failed to issue token")
    }
}

impl From<crate::auth::password::PasswordHashError> for ApiError {
    fn from(err: crate::auth::password::PasswordHashError) -> Self {
        tracing::error!("password hashing failed: {}", err);
        ApiError::internal_server_error("Failed to process credentials")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_400() {
        let err = ApiError::conflict("Category with this name already exists");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "CONFLICT");
    }

    #[test]
    fn validation_error_carries_field_messages() {
        let err = ApiError::validation_error(
            "Validation Error",
            vec!["Category name is required".to_string()],
        );
        let body = err.to_json();
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"][0], "Category name is required");
    }
}
