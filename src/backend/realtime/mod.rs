//! Real-time Module
//!
//! Presence tracking and event delivery for the chat hub.
//!
//! # Architecture
//!
//! - **`registry`** - which connections belong to which user
//! - **`broadcast`** - `Broadcaster` trait and the in-process `ConnectionHub`
//! - **`dispatcher`** - routes domain events to user and session groups
//! - **`connection`** - per-connection state machine and invocation handling
//! - **`subscription`** - axum WebSocket handler for `GET /hubs/chat`
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs          - Module exports and documentation
//! ├── registry.rs     - ConnectionRegistry
//! ├── broadcast.rs    - Groups, Broadcaster, ConnectionHub
//! ├── dispatcher.rs   - DeliveryDispatcher
//! ├── connection.rs   - RealtimeHub and ChatConnection
//! └── subscription.rs - WebSocket upgrade and socket loop
//! ```
//!
//! # Event Types
//!
//! - `ReceiveMessage` - a message was stored
//! - `UserTyping` - a participant is typing
//! - `MessageRead` - a message was marked read
//! - `SessionCreated` - a session was opened
//! - `UserOnline` / `UserOffline` - presence transitions

/// Connection bookkeeping
pub mod registry;

/// Group broadcast primitive
pub mod broadcast;

/// Event routing
pub mod dispatcher;

/// Connection lifecycle
pub mod connection;

/// WebSocket handler
pub mod subscription;

pub use broadcast::{Broadcaster, ConnectionHub, DeliveryError, Group};
pub use connection::{ChatConnection, ConnectionState, RealtimeHub};
pub use dispatcher::{DeliveryDispatcher, DispatchReport};
pub use registry::{ConnectionId, ConnectionRegistry};
pub use subscription::handle_chat_hub;
