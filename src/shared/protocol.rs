//! Realtime Hub Protocol
//!
//! JSON text frames exchanged over the chat hub socket.
//!
//! Client to server:
//!
//! ```json
//! {"invocationId": "1", "target": "SendMessage", "arguments": {"sessionId": 4, "text": "hi"}}
//! ```
//!
//! Server to client, either a pushed event or the completion of an invocation:
//!
//! ```json
//! {"type": "invocation", "target": "ReceiveMessage", "arguments": {...}, "timestamp": "..."}
//! {"type": "completion", "invocationId": "1", "result": {...}, "error": null}
//! ```

use crate::shared::chat::{MessageId, SessionId, UserId};
use crate::shared::event::{EventType, RealtimeEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw frame sent by a client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientFrame {
    /// Correlates the completion frame; omitted for fire-and-forget calls
    #[serde(default)]
    pub invocation_id: Option<String>,
    /// Name of the hub operation
    pub target: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

impl ClientFrame {
    /// Parse a text frame
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Malformed)
    }

    /// Resolve the target and its arguments into a typed invocation
    pub fn invocation(&self) -> Result<ClientInvocation, ProtocolError> {
        let arguments = self.arguments.clone();
        let invocation = match self.target.as_str() {
            "RegisterUser" => ClientInvocation::RegisterUser(serde_json::from_value(arguments)?),
            "SendMessage" => ClientInvocation::SendMessage(serde_json::from_value(arguments)?),
            "Typing" => ClientInvocation::Typing(serde_json::from_value(arguments)?),
            "MarkAsRead" => ClientInvocation::MarkAsRead(serde_json::from_value(arguments)?),
            other => return Err(ProtocolError::UnknownTarget(other.to_string())),
        };
        Ok(invocation)
    }
}

/// Operations a connected client may invoke
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientInvocation {
    RegisterUser(RegisterUserArgs),
    SendMessage(SendMessageArgs),
    Typing(TypingArgs),
    MarkAsRead(MarkAsReadArgs),
}

impl ClientInvocation {
    /// Target name, for logging
    pub fn target(&self) -> &'static str {
        match self {
            ClientInvocation::RegisterUser(_) => "RegisterUser",
            ClientInvocation::SendMessage(_) => "SendMessage",
            ClientInvocation::Typing(_) => "Typing",
            ClientInvocation::MarkAsRead(_) => "MarkAsRead",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserArgs {
    pub user_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageArgs {
    pub session_id: SessionId,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TypingArgs {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MarkAsReadArgs {
    pub message_id: MessageId,
}

/// Frame pushed from the server to one connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerFrame {
    /// A pushed event
    Invocation {
        target: EventType,
        arguments: serde_json::Value,
        timestamp: DateTime<Utc>,
    },
    /// Outcome of a client invocation, sent to the invoking connection only
    Completion {
        invocation_id: Option<String>,
        result: Option<serde_json::Value>,
        error: Option<String>,
    },
}

impl ServerFrame {
    /// Successful completion
    pub fn completed(invocation_id: Option<String>, result: Option<serde_json::Value>) -> Self {
        ServerFrame::Completion {
            invocation_id,
            result,
            error: None,
        }
    }

    /// Failed completion
    pub fn failed(invocation_id: Option<String>, error: impl Into<String>) -> Self {
        ServerFrame::Completion {
            invocation_id,
            result: None,
            error: Some(error.into()),
        }
    }
}

impl From<RealtimeEvent> for ServerFrame {
    fn from(event: RealtimeEvent) -> Self {
        ServerFrame::Invocation {
            target: event.event_type,
            arguments: event.payload,
            timestamp: event.timestamp,
        }
    }
}

/// Errors decoding a client frame
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unknown hub method: {0}")]
    UnknownTarget(String),
}
