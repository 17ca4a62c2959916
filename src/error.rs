//! Error types for slidegate
//!
//! Every upload failure is surfaced to the HTTP caller as a structured
//! JSON body of the form `{"success": false, "message": ...}` with an
//! optional `error` field carrying converter diagnostics.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::ConvertError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request carried no `file` field (400)
    #[error("no file uploaded")]
    NoFileProvided,

    /// Upload rejected before storage: bad MIME type, oversize, or
    /// content that is not an Office document (400)
    #[error("invalid upload: {0}")]
    Validation(String),

    /// External converter exited nonzero, failed to spawn, or produced
    /// no output file (500)
    #[error("conversion failed: {stderr}")]
    ConversionFailed { stderr: String },

    /// External converter exceeded the configured deadline (504)
    #[error("conversion timed out after {0} seconds")]
    ConversionTimeout(u64),

    /// Malformed multipart request body (400)
    #[error("multipart error: {0}")]
    Multipart(#[from] MultipartError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match self {
            ApiError::NoFileProvided => {
                (StatusCode::BAD_REQUEST, "No file uploaded".to_string(), None)
            }
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::ConversionFailed { stderr } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Conversion failed".to_string(),
                Some(stderr),
            ),
            ApiError::ConversionTimeout(secs) => (
                StatusCode::GATEWAY_TIMEOUT,
                "Conversion failed".to_string(),
                Some(format!("conversion process exceeded {} second limit", secs)),
            ),
            ApiError::Multipart(err) => (
                StatusCode::BAD_REQUEST,
                format!("Malformed upload: {}", err),
                None,
            ),
            ApiError::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                Some(err.to_string()),
            ),
            ApiError::Other(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                Some(err.to_string()),
            ),
        };

        let body = match detail {
            Some(error) => Json(json!({
                "success": false,
                "message": message,
                "error": error,
            })),
            None => Json(json!({
                "success": false,
                "message": message,
            })),
        };

        (status, body).into_response()
    }
}

impl From<ConvertError> for ApiError {
    fn from(err: ConvertError) -> Self {
        match err {
            ConvertError::TimedOut(elapsed) => ApiError::ConversionTimeout(elapsed.as_secs()),
            // Relay captured stderr verbatim when the converter wrote any;
            // spawn failures and silent exits get the error text instead.
            ConvertError::Failed { stderr, .. } if !stderr.trim().is_empty() => {
                ApiError::ConversionFailed { stderr }
            }
            other => ApiError::ConversionFailed {
                stderr: other.to_string(),
            },
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
