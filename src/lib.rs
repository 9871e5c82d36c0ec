//! Lost & Found Chat
//!
//! Realtime one-to-one chat between users of a lost-and-found service. Two
//! users share at most one chat session; messages are persisted first and then
//! pushed to every live connection of the participants.
//!
//! # Module Structure
//!
//! - **`shared`** - Transport-agnostic types
//!   - DTOs and the response envelope
//!   - Pushed events and hub protocol frames
//!   - `ChatError` kinds and configuration
//!
//! - **`backend`** - Server-side code
//!   - Axum HTTP API under `/api/chat`
//!   - WebSocket chat hub at `/hubs/chat`
//!   - Connection registry and delivery dispatcher
//!   - PostgreSQL and in-memory stores
//!
//! # Usage
//!
//! ```rust,no_run
//! use lostfound_chat::backend::server::create_app;
//! use lostfound_chat::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let addr = config.bind_addr;
//! let app = create_app(config).await;
//! let listener = tokio::net::TcpListener::bind(addr).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
