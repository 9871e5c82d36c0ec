//! Shared Module
//!
//! Types shared by the HTTP endpoints, the realtime hub and their clients:
//! DTOs, pushed events, hub protocol frames, domain error kinds and
//! configuration. Everything here is transport-agnostic and serializable.

/// Chat DTOs and identifiers
pub mod chat;

/// Real-time event system
pub mod event;

/// Realtime hub protocol frames
pub mod protocol;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use chat::{
    BaseResponse, ChatMessageDto, ChatSessionDetailsDto, ChatSessionSummaryDto, MessageId,
    SendChatMessageRequest, SessionId, UserId, UserProfile,
};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::ChatError;
pub use event::{
    EventType, PresenceStatusPayload, RealtimeEvent, SessionCreatedPayload, TypingIndicatorPayload,
};
pub use protocol::{ClientFrame, ClientInvocation, ProtocolError, ServerFrame};
