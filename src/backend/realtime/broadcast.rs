/**
 * Real-time Event Broadcasting
 *
 * This module provides the group-broadcast primitive the dispatcher pushes
 * through, and the in-process hub that implements it.
 *
 * # Groups
 *
 * - `Group::User` - every live connection of one user
 * - `Group::Session` - both participants of a chat session, resolved as the
 *   union of their per-user groups
 *
 * # Delivery
 *
 * Every connection owns a bounded `tokio::sync::mpsc` queue drained by its
 * socket writer. Pushing never waits: a full or closed queue is a
 * per-connection failure, reported back as `DeliveryError::Partial` while the
 * remaining connections of the group still receive the event.
 */

use crate::backend::realtime::registry::{ConnectionId, ConnectionRegistry};
use crate::shared::{RealtimeEvent, ServerFrame, SessionId, UserId};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// Sender half of a connection's outbound queue
pub type ConnectionSender = mpsc::Sender<ServerFrame>;

/// Broadcast destination
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Group {
    /// All connections of one user
    User(UserId),
    /// All connections of both participants of a session
    Session {
        session_id: SessionId,
        participants: [UserId; 2],
    },
}

impl Group {
    pub fn user(user_id: UserId) -> Self {
        Group::User(user_id)
    }

    pub fn session(session_id: SessionId, user_a: UserId, user_b: UserId) -> Self {
        Group::Session {
            session_id,
            participants: [user_a, user_b],
        }
    }

    /// Users whose connections make up this group
    pub fn members(&self) -> Vec<UserId> {
        match self {
            Group::User(user_id) => vec![*user_id],
            Group::Session { participants, .. } => {
                let mut members = participants.to_vec();
                members.dedup();
                members
            }
        }
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Group::User(user_id) => write!(f, "User_{user_id}"),
            Group::Session { session_id, .. } => write!(f, "ChatSession_{session_id}"),
        }
    }
}

/// Errors delivering an event to a group
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// Some connections of the target did not accept the event
    #[error("delivery to {target} failed for {failed} connection(s), {delivered} delivered")]
    Partial {
        target: String,
        delivered: usize,
        failed: usize,
    },

    /// The transport is gone altogether
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

/// Transport-agnostic group broadcast primitive
///
/// Implementations return the number of connections the event reached.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn send_to_group(&self, group: &Group, event: RealtimeEvent)
        -> Result<usize, DeliveryError>;

    async fn send_to_all(&self, event: RealtimeEvent) -> Result<usize, DeliveryError>;
}

/// In-process hub holding each live connection's outbound queue
pub struct ConnectionHub {
    registry: Arc<ConnectionRegistry>,
    outbound: DashMap<ConnectionId, ConnectionSender>,
}

impl ConnectionHub {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            registry,
            outbound: DashMap::new(),
        }
    }

    /// Attach a connection's outbound queue so groups can reach it
    pub fn attach(&self, connection_id: ConnectionId, sender: ConnectionSender) {
        self.outbound.insert(connection_id, sender);
    }

    /// Detach a connection; later events skip it
    pub fn detach(&self, connection_id: &ConnectionId) {
        self.outbound.remove(connection_id);
    }

    /// Number of attached connections
    pub fn attached_count(&self) -> usize {
        self.outbound.len()
    }

    /// Push one frame to one connection, without waiting
    pub fn send_to_connection(&self, connection_id: &ConnectionId, frame: ServerFrame) -> bool {
        let Some(sender) = self.outbound.get(connection_id).map(|s| s.value().clone()) else {
            return false;
        };
        match sender.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!("[Realtime] Outbound queue full for connection {}", connection_id);
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!("[Realtime] Outbound queue closed for connection {}", connection_id);
                false
            }
        }
    }

    fn deliver(
        &self,
        target: String,
        connections: impl IntoIterator<Item = ConnectionId>,
        event: RealtimeEvent,
    ) -> Result<usize, DeliveryError> {
        let frame = ServerFrame::from(event);
        let mut delivered = 0;
        let mut failed = 0;

        for connection_id in connections {
            if self.send_to_connection(&connection_id, frame.clone()) {
                delivered += 1;
            } else {
                failed += 1;
            }
        }

        tracing::debug!("[Realtime] Event to {} reached {} connection(s)", target, delivered);

        if failed > 0 {
            Err(DeliveryError::Partial {
                target,
                delivered,
                failed,
            })
        } else {
            Ok(delivered)
        }
    }
}

#[async_trait]
impl Broadcaster for ConnectionHub {
    async fn send_to_group(
        &self,
        group: &Group,
        event: RealtimeEvent,
    ) -> Result<usize, DeliveryError> {
        let connections: HashSet<ConnectionId> = group
            .members()
            .into_iter()
            .flat_map(|user_id| self.registry.get_connections(user_id))
            .collect();
        self.deliver(group.to_string(), connections, event)
    }

    async fn send_to_all(&self, event: RealtimeEvent) -> Result<usize, DeliveryError> {
        let connections: Vec<ConnectionId> =
            self.outbound.iter().map(|entry| entry.key().clone()).collect();
        self.deliver("All".to_string(), connections, event)
    }
}
