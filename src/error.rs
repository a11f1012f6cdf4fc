use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// The primary error type for the application.
///
/// Request-level variants (`NotFound`, `OutsideRoot`) never carry a body to the
/// client; everything else is reported through a JSON envelope.
#[derive(Debug, Error)]
pub enum AppError {
    /// A directory or file is missing or unreadable.
    #[error("Not found: {0}")]
    NotFound(String),
    /// A requested path escapes the configured root.
    #[error("Path outside root: {0}")]
    OutsideRoot(String),
    /// No non-loopback IPv4 interface is available. Fatal at startup.
    #[error("ip not found. Please connect to a network")]
    NetworkUnavailable,
    #[error("I/O error: {0}")]
    IoError(String),
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, error_message, details) = match self {
            AppError::NotFound(msg) => {
                tracing::warn!("Listing omitted, not found: {}", msg);
                return StatusCode::NOT_FOUND.into_response();
            }
            AppError::OutsideRoot(msg) => {
                // Dropped silently: the client sees an empty response, never the reason
                tracing::warn!("Request dropped, path outside root: {}", msg);
                return StatusCode::OK.into_response();
            }
            AppError::NetworkUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "NETWORK_UNAVAILABLE",
                "No LAN address available".to_string(),
                None,
            ),
            AppError::IoError(msg) => {
                tracing::error!("I/O error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IO_ERROR",
                    "An I/O error occurred".to_string(),
                    Some(json!({ "details": msg })),
                )
            }
            AppError::Internal(e) => {
                let error_id = uuid::Uuid::new_v4();
                tracing::error!("Internal error {}: {:?}", error_id, e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    Some(json!({ "error_id": error_id.to_string() })),
                )
            }
        };

        let mut body = json!({
            "error": {
                "code": error_code,
                "message": error_message,
            },
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        if let Some(details) = details {
            body["error"]["details"] = details;
        }

        (status, Json(body)).into_response()
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(format!("{}: {}", err.kind(), err))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(anyhow::anyhow!("blocking task join error: {}", err))
    }
}

/// A type alias for `Result<T, AppError>`, used throughout the application.
pub type AppResult<T> = Result<T, AppError>;
