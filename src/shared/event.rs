/**
 * Real-time Event System
 *
 * This module defines the events the server pushes to connected clients and
 * the ephemeral payloads they carry. Payloads are never persisted; they only
 * exist for the duration of one dispatch.
 */
use crate::shared::chat::{ChatMessageDto, ChatSessionDetailsDto, SessionId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of a server-to-client event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EventType {
    /// A message was stored in a session
    ReceiveMessage,
    /// A participant is typing
    UserTyping,
    /// A message was marked read by its receiver
    MessageRead,
    /// A session was opened between two users
    SessionCreated,
    /// A user's first connection came up
    UserOnline,
    /// A user's last connection went away
    UserOffline,
}

impl EventType {
    /// Event name as seen by clients
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ReceiveMessage => "ReceiveMessage",
            EventType::UserTyping => "UserTyping",
            EventType::MessageRead => "MessageRead",
            EventType::SessionCreated => "SessionCreated",
            EventType::UserOnline => "UserOnline",
            EventType::UserOffline => "UserOffline",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Real-time event that can be pushed to any number of connections
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RealtimeEvent {
    /// Type of event
    pub event_type: EventType,
    /// Event payload (JSON-serializable data)
    pub payload: serde_json::Value,
    /// Timestamp when event occurred
    pub timestamp: DateTime<Utc>,
}

impl RealtimeEvent {
    /// Create a new real-time event
    pub fn new(event_type: EventType, payload: serde_json::Value) -> Self {
        Self {
            event_type,
            payload,
            timestamp: Utc::now(),
        }
    }

    /// Create an event from any serializable payload
    pub fn from_payload<T: Serialize>(
        event_type: EventType,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(event_type, serde_json::to_value(payload)?))
    }

    /// Create a `ReceiveMessage` event
    pub fn message_received(message: &ChatMessageDto) -> Result<Self, serde_json::Error> {
        Self::from_payload(EventType::ReceiveMessage, message)
    }

    /// Create a `MessageRead` event
    pub fn message_read(message: &ChatMessageDto) -> Result<Self, serde_json::Error> {
        Self::from_payload(EventType::MessageRead, message)
    }

    /// Create a `UserTyping` event
    pub fn typing(payload: &TypingIndicatorPayload) -> Result<Self, serde_json::Error> {
        Self::from_payload(EventType::UserTyping, payload)
    }

    /// Create a `SessionCreated` event
    pub fn session_created(payload: &SessionCreatedPayload) -> Result<Self, serde_json::Error> {
        Self::from_payload(EventType::SessionCreated, payload)
    }

    /// Create a `UserOnline` or `UserOffline` event depending on the payload
    pub fn presence(payload: &PresenceStatusPayload) -> Result<Self, serde_json::Error> {
        let event_type = if payload.is_online {
            EventType::UserOnline
        } else {
            EventType::UserOffline
        };
        Self::from_payload(event_type, payload)
    }
}

/// Typing indicator for one session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TypingIndicatorPayload {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub target_user_id: UserId,
    pub sent_at: DateTime<Utc>,
}

/// Online/offline transition of a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PresenceStatusPayload {
    pub user_id: UserId,
    pub is_online: bool,
    pub changed_at: DateTime<Utc>,
}

impl PresenceStatusPayload {
    pub fn online(user_id: UserId) -> Self {
        Self {
            user_id,
            is_online: true,
            changed_at: Utc::now(),
        }
    }

    pub fn offline(user_id: UserId) -> Self {
        Self {
            user_id,
            is_online: false,
            changed_at: Utc::now(),
        }
    }
}

/// A session was opened; sent to both participants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreatedPayload {
    pub session_id: SessionId,
    pub initiator_user_id: UserId,
    pub target_user_id: UserId,
    pub session: ChatSessionDetailsDto,
    pub created_at: DateTime<Utc>,
}

impl SessionCreatedPayload {
    /// Build the payload for a session opened by `initiator`
    pub fn new(session: ChatSessionDetailsDto, initiator: UserId) -> Self {
        Self {
            session_id: session.id,
            initiator_user_id: initiator,
            target_user_id: session.other_participant(initiator),
            session,
            created_at: Utc::now(),
        }
    }
}
