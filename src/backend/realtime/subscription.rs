/**
 * Chat Hub Socket Handler
 *
 * `GET /hubs/chat` upgrades to a WebSocket. The bearer token comes from the
 * `Authorization` header or, for browser clients that cannot set headers on
 * an upgrade, the `access_token` query parameter. A bad token is answered
 * with 401 before the upgrade, so it never touches the registry.
 *
 * # Tasks per socket
 *
 * - reader: this handler's task, decoding text frames
 * - writer: drains the connection's outbound queue into the socket
 * - one task per invocation, so a `SendMessage` in flight still persists
 *   after the socket drops
 */

use crate::backend::auth::bearer_token;
use crate::backend::error::BackendError;
use crate::backend::realtime::connection::{ChatConnection, RealtimeHub};
use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::{header::AUTHORIZATION, HeaderMap},
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct HubQuery {
    pub access_token: Option<String>,
}

/// Token from `Authorization: Bearer ...`, else from `?access_token=`
pub fn connection_token(headers: &HeaderMap, query: &HubQuery) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_string)
        .or_else(|| query.access_token.clone().filter(|token| !token.is_empty()))
}

/// Handle a chat hub connection (GET /hubs/chat)
pub async fn handle_chat_hub(
    State(realtime): State<RealtimeHub>,
    headers: HeaderMap,
    Query(query): Query<HubQuery>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let token = connection_token(&headers, &query);
    let connection = match realtime.authenticate(token.as_deref()) {
        Ok(connection) => connection,
        Err(e) => return BackendError::from(e).into_response(),
    };

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => {
            tracing::warn!("[Realtime] Upgrade rejected: {}", rejection);
            return rejection.into_response();
        }
    };

    ws.on_upgrade(move |socket| serve_connection(realtime, connection, socket))
}

async fn serve_connection(realtime: RealtimeHub, mut connection: ChatConnection, socket: WebSocket) {
    let (mut sink, mut stream) = socket.split();

    let mut outbound = match connection.register(&realtime).await {
        Ok(outbound) => outbound,
        Err(e) => {
            tracing::error!("[Realtime] Failed to register {}: {}", connection.id(), e);
            return;
        }
    };

    let writer_id = connection.id().clone();
    let writer = tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            let text = match serde_json::to_string(&frame) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("[Realtime] Failed to serialize frame: {:?}", e);
                    continue;
                }
            };
            if let Err(e) = sink.send(Message::Text(text.into())).await {
                tracing::debug!("[Realtime] Write to {} failed: {}", writer_id, e);
                break;
            }
        }
        let _ = sink.close().await;
    });

    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => match connection.prepare(text.as_str()) {
                Ok(pending) => {
                    let realtime = realtime.clone();
                    tokio::spawn(async move { realtime.run(pending).await });
                }
                Err(frame) => {
                    realtime.reply(connection.id(), frame);
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!("[Realtime] Read from {} failed: {}", connection.id(), e);
                break;
            }
        }
    }

    connection.disconnect(&realtime).await;

    // detaching dropped the last sender, so the writer drains and exits
    if let Err(e) = writer.await {
        tracing::warn!("[Realtime] Writer task for {} ended abnormally: {}", connection.id(), e);
    }
}
