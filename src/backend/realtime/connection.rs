/**
 * Chat Hub Connections
 *
 * Transport-agnostic side of the realtime endpoint. `RealtimeHub` owns the
 * registry, the outbound hub and the dispatcher; `ChatConnection` tracks one
 * client through its lifecycle:
 *
 * ```text
 * Connecting --authenticate--> Authenticated --register--> Registered --disconnect--> Disconnected
 * ```
 *
 * A connection that fails authentication never reaches the registry.
 * Invocations are only accepted while `Registered`; each one is answered
 * with a completion frame sent to the invoking connection alone.
 *
 * Only `register` and `disconnect` touch the registry. Both hold a per-user
 * presence lock across the registry change and its `UserOnline`/`UserOffline`
 * dispatch, so observers see one user's transitions in the order they
 * happened even when a tab closes while another opens.
 */

use crate::backend::auth::JwtKeys;
use crate::backend::chat::service::ChatService;
use crate::backend::realtime::broadcast::ConnectionHub;
use crate::backend::realtime::dispatcher::DeliveryDispatcher;
use crate::backend::realtime::registry::{ConnectionId, ConnectionRegistry};
use crate::shared::{
    ChatError, ClientFrame, ClientInvocation, PresenceStatusPayload, ServerFrame,
    TypingIndicatorPayload, UserId,
};
use chrono::Utc;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, OwnedMutexGuard};

/// Lifecycle of one hub connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Authenticated,
    Registered,
    Disconnected,
}

/// Who issued an invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub connection_id: ConnectionId,
    pub user_id: UserId,
}

/// A parsed invocation waiting to run
#[derive(Debug, Clone)]
pub struct PendingInvocation {
    pub caller: Caller,
    pub invocation_id: Option<String>,
    pub invocation: ClientInvocation,
}

/// Shared realtime context, cloned into every socket task
#[derive(Clone)]
pub struct RealtimeHub {
    registry: Arc<ConnectionRegistry>,
    hub: Arc<ConnectionHub>,
    dispatcher: DeliveryDispatcher,
    chat: ChatService,
    keys: JwtKeys,
    buffer: usize,
    presence: Arc<DashMap<UserId, Arc<Mutex<()>>>>,
}

impl RealtimeHub {
    /// Build the registry, hub and dispatcher around a chat service
    ///
    /// `buffer` is the capacity of each connection's outbound queue.
    pub fn new(chat: ChatService, keys: JwtKeys, buffer: usize) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let hub = Arc::new(ConnectionHub::new(registry.clone()));
        let dispatcher = DeliveryDispatcher::new(hub.clone());
        Self {
            registry,
            hub,
            dispatcher,
            chat,
            keys,
            buffer,
            presence: Arc::new(DashMap::new()),
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub fn dispatcher(&self) -> &DeliveryDispatcher {
        &self.dispatcher
    }

    pub fn chat(&self) -> &ChatService {
        &self.chat
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    /// Resolve the connection's token to a user
    pub fn authenticate(&self, token: Option<&str>) -> Result<ChatConnection, ChatError> {
        let mut connection = ChatConnection::new();
        let token = token.ok_or_else(|| {
            tracing::warn!("[Realtime] Connection {} without token rejected", connection.id);
            ChatError::unauthorized("Missing access token.")
        })?;

        let user_id = self.keys.authenticate(token).map_err(|e| {
            tracing::warn!("[Realtime] Connection {} rejected: {}", connection.id, e);
            ChatError::unauthorized("Invalid access token.")
        })?;

        connection.user_id = Some(user_id);
        connection.state = ConnectionState::Authenticated;
        tracing::debug!("[Realtime] Connection {} authenticated as user {}", connection.id, user_id);
        Ok(connection)
    }

    /// Serializes presence transitions of one user
    async fn presence_guard(&self, user_id: UserId) -> OwnedMutexGuard<()> {
        let lock = self.presence.entry(user_id).or_default().value().clone();
        lock.lock_owned().await
    }

    /// Send a frame to one connection
    pub fn reply(&self, connection_id: &ConnectionId, frame: ServerFrame) -> bool {
        self.hub.send_to_connection(connection_id, frame)
    }

    /// Run an invocation and send its completion to the caller
    pub async fn run(&self, pending: PendingInvocation) {
        let connection_id = pending.caller.connection_id.clone();
        let frame = self.complete(pending).await;
        if !self.reply(&connection_id, frame) {
            tracing::debug!("[Realtime] Completion for {} dropped, connection gone", connection_id);
        }
    }

    /// Run an invocation and build its completion frame
    pub async fn complete(&self, pending: PendingInvocation) -> ServerFrame {
        let target = pending.invocation.target();
        match self.execute(&pending.caller, pending.invocation).await {
            Ok(result) => ServerFrame::completed(pending.invocation_id, Some(result)),
            Err(e) => {
                tracing::debug!(
                    "[Realtime] {} from user {} failed: {}",
                    target,
                    pending.caller.user_id,
                    e
                );
                ServerFrame::failed(pending.invocation_id, e.to_string())
            }
        }
    }

    /// Delegate one invocation to the chat service, then to the dispatcher
    pub async fn execute(
        &self,
        caller: &Caller,
        invocation: ClientInvocation,
    ) -> Result<Value, ChatError> {
        match invocation {
            ClientInvocation::RegisterUser(args) => {
                if args.user_id != caller.user_id {
                    tracing::warn!(
                        "[Realtime] Connection {} of user {} tried to register as {}",
                        caller.connection_id,
                        caller.user_id,
                        args.user_id
                    );
                    return Err(ChatError::unauthorized(
                        "You can only register your own user id.",
                    ));
                }
                // registration happened on connect; an invocation may finish
                // after disconnect, so it must not touch the registry
                Ok(Value::Null)
            }
            ClientInvocation::SendMessage(args) => {
                let message = self
                    .chat
                    .post_message(args.session_id, caller.user_id, &args.text)
                    .await?;
                self.dispatcher.on_message_sent(&message).await;
                to_result(&message)
            }
            ClientInvocation::Typing(args) => {
                let target_user_id = self.chat.session_peer(args.session_id, caller.user_id).await?;
                let payload = TypingIndicatorPayload {
                    session_id: args.session_id,
                    user_id: caller.user_id,
                    target_user_id,
                    sent_at: Utc::now(),
                };
                self.dispatcher.on_user_typing(&payload).await;
                Ok(Value::Null)
            }
            ClientInvocation::MarkAsRead(args) => {
                let message = self
                    .chat
                    .mark_message_as_read(args.message_id, caller.user_id)
                    .await?;
                self.dispatcher.on_message_read(&message).await;
                to_result(&message)
            }
        }
    }
}

fn to_result<T: serde::Serialize>(value: &T) -> Result<Value, ChatError> {
    serde_json::to_value(value).map_err(|e| ChatError::unavailable(e.to_string()))
}

/// One client connection to the chat hub
#[derive(Debug)]
pub struct ChatConnection {
    id: ConnectionId,
    user_id: Option<UserId>,
    state: ConnectionState,
}

impl Default for ChatConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatConnection {
    pub fn new() -> Self {
        Self {
            id: ConnectionId::generate(),
            user_id: None,
            state: ConnectionState::Connecting,
        }
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    fn caller(&self) -> Result<Caller, ChatError> {
        match (self.state, self.user_id) {
            (ConnectionState::Registered, Some(user_id)) => Ok(Caller {
                connection_id: self.id.clone(),
                user_id,
            }),
            (ConnectionState::Disconnected, _) => {
                Err(ChatError::unavailable("Connection is closed."))
            }
            _ => Err(ChatError::unauthorized("Connection is not registered.")),
        }
    }

    /// Join the hub: attach the outbound queue, join the user's group and
    /// announce the user if this is their first connection
    ///
    /// Returns the receiving half of the outbound queue for the socket writer.
    pub async fn register(
        &mut self,
        realtime: &RealtimeHub,
    ) -> Result<mpsc::Receiver<ServerFrame>, ChatError> {
        let user_id = match (self.state, self.user_id) {
            (ConnectionState::Authenticated, Some(user_id)) => user_id,
            (ConnectionState::Registered, _) => {
                return Err(ChatError::invalid_argument("Connection is already registered."))
            }
            (ConnectionState::Disconnected, _) => {
                return Err(ChatError::unavailable("Connection is closed."))
            }
            _ => return Err(ChatError::unauthorized("Connection is not authenticated.")),
        };

        let (tx, rx) = mpsc::channel(realtime.buffer);
        let _presence = realtime.presence_guard(user_id).await;
        realtime.hub.attach(self.id.clone(), tx);
        let came_online = realtime.registry.add_connection(user_id, self.id.clone());
        self.state = ConnectionState::Registered;

        tracing::info!(
            "[Realtime] User {} connected on {} ({} online, {} connections)",
            user_id,
            self.id,
            realtime.registry.online_user_count(),
            realtime.registry.connection_count()
        );

        if came_online {
            realtime
                .dispatcher
                .on_presence_changed(&PresenceStatusPayload::online(user_id))
                .await;
        }
        Ok(rx)
    }

    /// Decode a text frame into an invocation ready to run
    ///
    /// Failures come back as the completion frame to send to this connection.
    pub fn prepare(&self, text: &str) -> Result<PendingInvocation, ServerFrame> {
        let frame = ClientFrame::parse(text).map_err(|e| {
            tracing::debug!("[Realtime] Malformed frame on {}: {}", self.id, e);
            ServerFrame::failed(None, e.to_string())
        })?;

        let caller = self
            .caller()
            .map_err(|e| ServerFrame::failed(frame.invocation_id.clone(), e.to_string()))?;

        let invocation = frame
            .invocation()
            .map_err(|e| ServerFrame::failed(frame.invocation_id.clone(), e.to_string()))?;

        Ok(PendingInvocation {
            caller,
            invocation_id: frame.invocation_id,
            invocation,
        })
    }

    /// Leave the hub and announce the user offline if this was their last
    /// connection. Safe to call more than once.
    pub async fn disconnect(&mut self, realtime: &RealtimeHub) {
        let was_registered = self.state == ConnectionState::Registered;
        self.state = ConnectionState::Disconnected;

        let Some(user_id) = self.user_id.filter(|_| was_registered) else {
            return;
        };

        let _presence = realtime.presence_guard(user_id).await;
        let went_offline = realtime.registry.remove_connection(user_id, &self.id);
        realtime.hub.detach(&self.id);

        tracing::info!("[Realtime] User {} disconnected from {}", user_id, self.id);

        if went_offline {
            realtime
                .dispatcher
                .on_presence_changed(&PresenceStatusPayload::offline(user_id))
                .await;
        }
    }
}
