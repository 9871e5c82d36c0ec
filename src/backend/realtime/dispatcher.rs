/**
 * Presence and Delivery Dispatcher
 *
 * Translates chat domain events into group broadcasts. The dispatcher only
 * decides *who* receives an event; pushing bytes is left to whichever
 * `Broadcaster` it was built with.
 *
 * # Routing
 *
 * | Event            | Groups                                        |
 * |------------------|-----------------------------------------------|
 * | `ReceiveMessage` | session, receiver, sender                     |
 * | `UserTyping`     | session, typing user, target user             |
 * | `MessageRead`    | session, sender, receiver                     |
 * | `SessionCreated` | initiator, target                             |
 * | `UserOnline/Off` | everyone                                      |
 *
 * Group deliveries run concurrently and independently. A failing group is
 * logged and never stops the others, and never rolls back the mutation that
 * produced the event.
 */

use crate::backend::realtime::broadcast::{Broadcaster, Group};
use crate::shared::{
    ChatMessageDto, PresenceStatusPayload, RealtimeEvent, SessionCreatedPayload,
    TypingIndicatorPayload,
};
use futures_util::future::join_all;
use std::sync::Arc;

/// Outcome of one dispatch call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Number of groups targeted
    pub groups: usize,
    /// Connections reached across all groups
    pub delivered: usize,
    /// Names of groups whose delivery failed
    pub failed_groups: Vec<String>,
}

impl DispatchReport {
    pub fn is_complete(&self) -> bool {
        self.failed_groups.is_empty()
    }
}

/// Routes domain events to connection groups
#[derive(Clone)]
pub struct DeliveryDispatcher {
    broadcaster: Arc<dyn Broadcaster>,
}

impl DeliveryDispatcher {
    pub fn new(broadcaster: Arc<dyn Broadcaster>) -> Self {
        Self { broadcaster }
    }

    /// A message was stored
    pub async fn on_message_sent(&self, message: &ChatMessageDto) -> DispatchReport {
        tracing::debug!(
            "[Realtime] Dispatching ReceiveMessage for session {} from {} to {}",
            message.chat_session_id,
            message.sender_id,
            message.receiver_id
        );
        let groups = vec![
            Group::session(message.chat_session_id, message.sender_id, message.receiver_id),
            Group::user(message.receiver_id),
            Group::user(message.sender_id),
        ];
        self.fan_out(groups, RealtimeEvent::message_received(message))
            .await
    }

    /// A participant is typing
    pub async fn on_user_typing(&self, payload: &TypingIndicatorPayload) -> DispatchReport {
        tracing::debug!(
            "[Realtime] Dispatching typing indicator for session {} user {}",
            payload.session_id,
            payload.user_id
        );
        let groups = vec![
            Group::session(payload.session_id, payload.user_id, payload.target_user_id),
            Group::user(payload.user_id),
            Group::user(payload.target_user_id),
        ];
        self.fan_out(groups, RealtimeEvent::typing(payload)).await
    }

    /// A message was marked read
    pub async fn on_message_read(&self, message: &ChatMessageDto) -> DispatchReport {
        tracing::debug!("[Realtime] Dispatching MessageRead for message {}", message.id);
        let groups = vec![
            Group::session(message.chat_session_id, message.sender_id, message.receiver_id),
            Group::user(message.sender_id),
            Group::user(message.receiver_id),
        ];
        self.fan_out(groups, RealtimeEvent::message_read(message)).await
    }

    /// A session was opened
    pub async fn on_session_created(&self, payload: &SessionCreatedPayload) -> DispatchReport {
        tracing::info!("[Realtime] Dispatching SessionCreated for session {}", payload.session_id);
        let groups = vec![
            Group::user(payload.initiator_user_id),
            Group::user(payload.target_user_id),
        ];
        self.fan_out(groups, RealtimeEvent::session_created(payload))
            .await
    }

    /// A user came online or went offline
    pub async fn on_presence_changed(&self, payload: &PresenceStatusPayload) -> DispatchReport {
        tracing::debug!(
            "[Realtime] Dispatching presence change for user {} online={}",
            payload.user_id,
            payload.is_online
        );
        let event = match RealtimeEvent::presence(payload) {
            Ok(event) => event,
            Err(e) => {
                tracing::error!("[Realtime] Failed to serialize presence event: {:?}", e);
                return DispatchReport {
                    groups: 1,
                    delivered: 0,
                    failed_groups: vec!["All".to_string()],
                };
            }
        };

        match self.broadcaster.send_to_all(event).await {
            Ok(delivered) => DispatchReport {
                groups: 1,
                delivered,
                failed_groups: Vec::new(),
            },
            Err(e) => {
                tracing::warn!("[Realtime] Presence broadcast failed: {}", e);
                DispatchReport {
                    groups: 1,
                    delivered: 0,
                    failed_groups: vec!["All".to_string()],
                }
            }
        }
    }

    async fn fan_out(
        &self,
        groups: Vec<Group>,
        event: Result<RealtimeEvent, serde_json::Error>,
    ) -> DispatchReport {
        let event = match event {
            Ok(event) => event,
            Err(e) => {
                tracing::error!("[Realtime] Failed to serialize event: {:?}", e);
                return DispatchReport {
                    groups: groups.len(),
                    delivered: 0,
                    failed_groups: groups.iter().map(ToString::to_string).collect(),
                };
            }
        };

        let deliveries = groups.iter().map(|group| {
            let event = event.clone();
            async move { (group, self.broadcaster.send_to_group(group, event).await) }
        });

        let mut report = DispatchReport {
            groups: groups.len(),
            ..DispatchReport::default()
        };
        for (group, result) in join_all(deliveries).await {
            match result {
                Ok(count) => report.delivered += count,
                Err(e) => {
                    tracing::warn!("[Realtime] {} delivery to {} failed: {}", event.event_type, group, e);
                    report.failed_groups.push(group.to_string());
                }
            }
        }
        report
    }
}
