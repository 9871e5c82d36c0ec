//! Shared Error Types
//!
//! Domain error kinds surfaced by the chat service and carried to whichever
//! transport invoked it (HTTP status code or realtime completion error).
//!
//! # Error Kinds
//!
//! - `InvalidArgument` - self-chat attempts, blank message text
//! - `NotFound` - unknown session, message, or target user
//! - `Unauthorized` - non-participant access, mismatched self-registration
//! - `Unavailable` - persistence or transport failure
//!
//! # Usage
//!
//! ```rust
//! use lostfound_chat::shared::error::ChatError;
//!
//! let error = ChatError::invalid_argument("Message text cannot be empty.");
//! assert_eq!(error.kind(), "invalid_argument");
//! ```
use thiserror::Error;

/// Errors returned by chat operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// The request itself is malformed
    #[error("{message}")]
    InvalidArgument {
        /// Human-readable error message
        message: String,
    },

    /// A referenced entity does not exist
    #[error("{message}")]
    NotFound {
        /// Human-readable error message
        message: String,
    },

    /// The caller may not touch this entity
    #[error("{message}")]
    Unauthorized {
        /// Human-readable error message
        message: String,
    },

    /// A collaborator (store, transport) failed
    #[error("Service unavailable: {message}")]
    Unavailable {
        /// Human-readable error message
        message: String,
    },
}

impl ChatError {
    /// Create a new invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a new not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a new unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Stable snake_case name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::NotFound { .. } => "not_found",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Unavailable { .. } => "unavailable",
        }
    }
}
