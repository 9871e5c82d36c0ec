//! Backend Error Module
//!
//! Errors raised by the HTTP layer and how they become responses.
//!
//! # Architecture
//!
//! - **`types`** - `BackendError` and its status code mapping
//! - **`conversion`** - `IntoResponse`, rendering the `BaseResponse` failure envelope
//!
//! # Status Codes
//!
//! | Kind              | Status |
//! |-------------------|--------|
//! | `InvalidArgument` | 400    |
//! | `Unauthorized`    | 401    |
//! | `NotFound`        | 404    |
//! | `Unavailable`     | 503    |

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::BackendError;
