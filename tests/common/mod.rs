//! Common test utilities and helpers
//!
//! - Fixture users, tokens and application state
//! - Realtime connection helpers
//! - Custom assertion macros

pub mod assertions;
pub mod fixtures;

pub use fixtures::*;
pub use realtime::*;
