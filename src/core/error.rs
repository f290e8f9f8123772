use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Caller supplied out-of-domain input (negative quantity, bad percentage, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced document, item or payment does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation not permitted for the document's kind or state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Stored document changed since it was loaded
    #[error("Version conflict: {0}")]
    VersionConflict(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        HttpResponse::build(status_code).json(serde_json::json!({
            "error": {
                "message": error_message,
                "code": status_code.as_u16(),
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidOperation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::VersionConflict(_) => StatusCode::CONFLICT,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        AppError::InvalidOperation(msg.into())
    }

    pub fn version_conflict(msg: impl Into<String>) -> Self {
        AppError::VersionConflict(msg.into())
    }
}
