//! Authentication Module
//!
//! Token verification and user lookup for the chat endpoints.
//!
//! # Architecture
//!
//! - **`sessions`** - JWT issue and verification
//! - **`users`** - `UserDirectory` trait with PostgreSQL and in-memory implementations
//!
//! Login and signup live in the wider platform; this crate only verifies the
//! tokens it hands out (and mints them for tests and tooling).

/// JWT token generation and validation
pub mod sessions;

/// User lookup
pub mod users;

pub use sessions::{bearer_token, AuthError, Claims, JwtKeys};
pub use users::{InMemoryUserDirectory, PgUserDirectory, UserDirectory};
