//! Chat Backend Module
//!
//! One-to-one chat sessions between platform users: domain rules, storage
//! and the HTTP endpoints.
//!
//! # Architecture
//!
//! - **`store`** - row types and the `ChatSessionStore` trait
//! - **`state`** - in-memory store, used without a database and in tests
//! - **`db`** - PostgreSQL store
//! - **`service`** - `ChatService`, the domain rules
//! - **`handlers`** - HTTP handlers under `/api/chat`
//!
//! # Example
//!
//! ```rust,no_run
//! use lostfound_chat::backend::auth::InMemoryUserDirectory;
//! use lostfound_chat::backend::chat::{ChatService, InMemoryChatStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), lostfound_chat::shared::ChatError> {
//! let users = InMemoryUserDirectory::new().with_user(1, "Ada").with_user(2, "Grace");
//! let chat = ChatService::new(Arc::new(InMemoryChatStore::new()), Arc::new(users));
//! let session = chat.open_or_create_session(1, 2).await?;
//! chat.send_message(session.id, 1, "I found your keys").await?;
//! # Ok(())
//! # }
//! ```

/// Persistence boundary
pub mod store;

/// In-memory store
pub mod state;

/// PostgreSQL store
pub mod db;

/// Domain service
pub mod service;

/// HTTP handlers
pub mod handlers;

pub use db::PgChatStore;
pub use service::{ChatService, MessageSent, SessionOpened};
pub use state::InMemoryChatStore;
pub use store::{ChatMessage, ChatSession, ChatSessionStore, NewChatMessage};
