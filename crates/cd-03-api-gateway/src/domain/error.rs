//! API error envelope and gateway errors.
//!
//! Every failed request answers `{"success": false, "message": ..., "code": ...}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cd_02_draw_engine::DrawError;
use serde::Serialize;

/// Stable error codes not produced by the draw engine itself
pub mod codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const METHOD_NOT_ALLOWED: &str = "METHOD_NOT_ALLOWED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const TIMEOUT: &str = "TIMEOUT";
}

/// Error returned by a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// JSON body of an error response
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub success: bool,
    pub message: &'a str,
    pub code: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// Bad input (400)
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::VALIDATION_ERROR, message)
    }

    /// Wrong HTTP method (405)
    pub fn method_not_allowed() -> Self {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            codes::METHOD_NOT_ALLOWED,
            "Method not allowed",
        )
    }

    /// Unknown route (404)
    pub fn not_found(path: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            codes::NOT_FOUND,
            format!("No such endpoint: {}", path),
        )
    }

    /// Request exceeded its time budget (504)
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, codes::TIMEOUT, message)
    }

    pub fn body(&self) -> ErrorBody<'_> {
        ErrorBody {
            success: false,
            message: &self.message,
            code: self.code,
        }
    }
}

impl From<DrawError> for ApiError {
    fn from(err: DrawError) -> Self {
        let status = match &err {
            DrawError::Validation(_) | DrawError::Locked | DrawError::LotteryFull { .. } => {
                StatusCode::BAD_REQUEST
            }
            DrawError::Auth => StatusCode::UNAUTHORIZED,
            DrawError::MaxRetriesExceeded { .. } => StatusCode::SERVICE_UNAVAILABLE,
            DrawError::StoreUnavailable(_) | DrawError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.code(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body())).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Gateway lifecycle errors
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Server stopped with an I/O error
    #[error("server error: {0}")]
    Server(String),
}
