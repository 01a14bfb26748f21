use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Error codes for categorizing errors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum ErrorCode {
    // Verification errors (1xxx)
    #[serde(rename = "SIG_1001")]
    WebhookRejected,

    // Validation errors (3xxx)
    #[serde(rename = "VAL_3001")]
    InvalidInput,
    #[serde(rename = "VAL_3003")]
    InvalidFormat,

    // Database errors (7xxx)
    #[serde(rename = "DB_7002")]
    QueryFailed,

    // Internal errors (9xxx)
    #[serde(rename = "INT_9999")]
    InternalServerError,
    #[serde(rename = "INT_9998")]
    ConfigurationError,
}

impl ErrorCode {
    /// Get numeric code
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::WebhookRejected => 1001,
            ErrorCode::InvalidInput => 3001,
            ErrorCode::InvalidFormat => 3003,
            ErrorCode::QueryFailed => 7002,
            ErrorCode::InternalServerError => 9999,
            ErrorCode::ConfigurationError => 9998,
        }
    }

    /// Get user-friendly message
    pub fn message(&self) -> &'static str {
        match self {
            // The same message covers signature and freshness rejections so
            // the caller cannot tell which check failed.
            ErrorCode::WebhookRejected => "Invalid signature or request is too old",
            ErrorCode::InvalidInput => "Invalid input provided",
            ErrorCode::InvalidFormat => "Invalid format provided",
            ErrorCode::QueryFailed => "Database query failed",
            ErrorCode::InternalServerError => "An internal server error occurred",
            ErrorCode::ConfigurationError => "Server configuration error",
        }
    }
}

/// Structured error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    pub request_id: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    pub code_number: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("{1}")]
    WithCode(ErrorCode, String),

    #[error("{1}")]
    WithCodeAndDetails(ErrorCode, String, String),
}

impl ApiError {
    /// Create error with specific error code
    pub fn with_code(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError::WithCode(code, message.into())
    }

    /// Create error with code and additional details
    pub fn with_details(
        code: ErrorCode,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        ApiError::WithCodeAndDetails(code, message.into(), details.into())
    }

    /// Helper: webhook rejected (signature mismatch or stale timestamp)
    pub fn webhook_rejected() -> Self {
        ApiError::with_code(ErrorCode::WebhookRejected, ErrorCode::WebhookRejected.message())
    }

    /// Get error code
    fn error_code(&self) -> ErrorCode {
        match self {
            ApiError::BadRequest(_) => ErrorCode::InvalidInput,
            ApiError::Forbidden(_) => ErrorCode::WebhookRejected,
            ApiError::Database(_) => ErrorCode::QueryFailed,
            ApiError::Configuration(_) => ErrorCode::ConfigurationError,
            ApiError::Internal(_) => ErrorCode::InternalServerError,
            ApiError::WithCode(code, _) => *code,
            ApiError::WithCodeAndDetails(code, _, _) => *code,
        }
    }

    /// Get error details
    fn error_details(&self) -> Option<String> {
        match self {
            ApiError::WithCodeAndDetails(_, _, details) => Some(details.clone()),
            _ => None,
        }
    }

    /// Get status code
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_)
            | ApiError::WithCode(ErrorCode::InvalidInput, _)
            | ApiError::WithCode(ErrorCode::InvalidFormat, _)
            | ApiError::WithCodeAndDetails(ErrorCode::InvalidInput, _, _)
            | ApiError::WithCodeAndDetails(ErrorCode::InvalidFormat, _, _) => {
                StatusCode::BAD_REQUEST
            }

            ApiError::Forbidden(_)
            | ApiError::WithCode(ErrorCode::WebhookRejected, _)
            | ApiError::WithCodeAndDetails(ErrorCode::WebhookRejected, _, _) => {
                StatusCode::FORBIDDEN
            }

            ApiError::Database(_)
            | ApiError::Configuration(_)
            | ApiError::Internal(_)
            | ApiError::WithCode(_, _)
            | ApiError::WithCodeAndDetails(_, _, _) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log error with appropriate level
    fn log_error(&self, request_id: &str) {
        match self.status_code() {
            status if status.is_server_error() => {
                error!(
                    request_id = %request_id,
                    error = %self,
                    "Server error occurred"
                );
            }
            status if status.is_client_error() => {
                warn!(
                    request_id = %request_id,
                    error = %self,
                    "Client error occurred"
                );
            }
            _ => {}
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let status = self.status_code();
        let code = self.error_code();

        // Log the error
        self.log_error(&request_id);

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code,
                code_number: code.code(),
                message: match &self {
                    ApiError::WithCode(_, msg) | ApiError::WithCodeAndDetails(_, msg, _) => {
                        msg.clone()
                    }
                    ApiError::Forbidden(msg) | ApiError::BadRequest(msg) => msg.clone(),
                    _ => code.message().to_string(),
                },
                details: self.error_details(),
            },
            request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(error_response)).into_response()
    }
}

/// Handle Axum JSON rejections and convert to structured API errors
pub fn handle_rejection(err: JsonRejection) -> Response {
    match err {
        JsonRejection::JsonDataError(e) => ApiError::with_details(
            ErrorCode::InvalidInput,
            "Invalid input provided",
            e.to_string(),
        )
        .into_response(),
        JsonRejection::JsonSyntaxError(_) => {
            ApiError::with_code(ErrorCode::InvalidFormat, "Invalid JSON format").into_response()
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::with_code(ErrorCode::InvalidFormat, "JSON content type required")
                .into_response()
        }
        JsonRejection::BytesRejection(_) => {
            ApiError::with_code(ErrorCode::InvalidInput, "Invalid request body format")
                .into_response()
        }
        _ => ApiError::with_details(
            ErrorCode::InvalidInput,
            "Invalid input provided",
            format!("{:?}", err),
        )
        .into_response(),
    }
}
