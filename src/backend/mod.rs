//! Backend Module
//!
//! Server-side code: the Axum HTTP API for chat sessions, the realtime chat
//! hub over WebSocket, and the stores behind them.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, database loading
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`chat`** - Chat domain service, stores and HTTP handlers
//! - **`realtime`** - Connection registry, hub and event dispatch
//! - **`auth`** - JWT verification and the user directory
//! - **`middleware`** - Bearer token middleware for the HTTP API
//! - **`error`** - Backend error type and its HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── chat/           - Chat service, stores, handlers
//! ├── realtime/       - Presence and delivery
//! ├── auth/           - Tokens and users
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # Delivery
//!
//! HTTP writes and hub invocations both go through `ChatService` first and
//! only then through `DeliveryDispatcher`, so a pushed event always describes
//! something already persisted. Delivery failures are logged and never undo
//! the write.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Chat sessions and messages
pub mod chat;

/// Real-time presence and delivery
pub mod realtime;

/// Backend error types
pub mod error;

/// Token verification and user lookup
pub mod auth;

/// Middleware for request processing
pub mod middleware;

pub use chat::ChatService;
pub use error::BackendError;
pub use realtime::{ConnectionRegistry, DeliveryDispatcher, RealtimeHub};
pub use server::create_app;
