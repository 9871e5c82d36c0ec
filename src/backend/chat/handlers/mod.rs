//! Chat Handlers Module
//!
//! HTTP equivalents of the chat hub operations, for clients polling while
//! the realtime channel is unavailable. Every handler runs behind
//! `auth_middleware`, answers with a `BaseResponse` envelope and notifies the
//! dispatcher exactly like the hub does.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── sessions.rs - list, open and read sessions
//! └── messages.rs - list, send and mark messages read
//! ```
//!
//! # Route Handlers
//!
//! - `GET /api/chat/sessions` - [`get_sessions`]
//! - `POST /api/chat/sessions/{id}` - [`open_session`], `id` is the other user
//! - `GET /api/chat/sessions/{id}` - [`get_session`]
//! - `GET /api/chat/sessions/{id}/messages` - [`get_messages`]
//! - `POST /api/chat/sessions/{id}/messages` - [`send_message`]
//! - `PUT /api/chat/messages/{id}/read` - [`mark_message_read`]

/// Session handlers
pub mod sessions;

/// Message handlers
pub mod messages;

pub use messages::{get_messages, mark_message_read, send_message};
pub use sessions::{get_session, get_sessions, open_session};
