//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! - **`auth`** - bearer token authentication for the chat routes

pub mod auth;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};
