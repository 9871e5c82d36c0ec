/**
 * Backend Error Types
 *
 * `BackendError` is what HTTP handlers return. Domain failures arrive as
 * `ChatError` and keep their kind; the rest are request-level problems
 * (bad headers, bad tokens) or serialization failures.
 */

use crate::backend::auth::AuthError;
use crate::shared::ChatError;
use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    /// Domain error from the chat service
    #[error(transparent)]
    Chat(#[from] ChatError),

    /// Handler error (e.g., missing headers, invalid request)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Missing or rejected credentials
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Chat(err) => match err {
                ChatError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
                ChatError::NotFound { .. } => StatusCode::NOT_FOUND,
                ChatError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
                ChatError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::HandlerError { status, .. } => *status,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::Chat(err) => err.to_string(),
            Self::HandlerError { message, .. } => message.clone(),
            Self::Auth(err) => err.to_string(),
            Self::SerializationError(err) => err.to_string(),
        }
    }
}
