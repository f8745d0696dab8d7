//! WebSocket upgrade and per-connection loop.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, info, warn};

use medibook_realtime::message::{InboundMessage, OutboundMessage};

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameter for WebSocket authentication.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// JWT access token.
    pub token: String,
}

/// GET /ws?token={jwt}
///
/// Browsers cannot set headers on a WebSocket handshake, so the token
/// travels as a query parameter. Authentication happens before the
/// upgrade; a bad token is rejected as plain HTTP 401.
pub async fn upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, ApiError> {
    let claims = state.jwt_decoder.decode(&query.token)?;

    Ok(ws.on_upgrade(move |socket| serve_connection(state, socket, claims)))
}

/// Runs one established WebSocket connection until it closes.
async fn serve_connection(state: AppState, socket: WebSocket, claims: medibook_auth::Claims) {
    let user_id = claims.user_id();
    let (handle, mut outbound_rx) =
        state
            .connections
            .register(user_id, claims.role, claims.username.clone());
    let conn_id = handle.id;

    info!(conn_id = %conn_id, user_id = %user_id, "WebSocket connected");

    let (mut ws_tx, mut ws_rx) = socket.split();

    // Forward queued outbound messages to the socket.
    let outbound_task = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Failed to serialize outbound message");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => handle_inbound(&state, user_id, &handle, &text).await,
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    state.connections.unregister(&conn_id);
    outbound_task.abort();
    info!(conn_id = %conn_id, user_id = %user_id, "WebSocket disconnected");
}

async fn handle_inbound(
    state: &AppState,
    user_id: uuid::Uuid,
    handle: &medibook_realtime::connection::ConnectionHandle,
    text: &str,
) {
    let msg: InboundMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(e) => {
            debug!(user_id = %user_id, error = %e, "Ignoring malformed WS message");
            return;
        }
    };

    match msg {
        InboundMessage::Ping => {
            handle.send(OutboundMessage::Pong);
        }
        InboundMessage::MarkRead { notification_id } => {
            // Same semantics as the REST mark-read endpoint.
            if let Err(e) = state
                .notification_service
                .mark_read_raw(user_id, notification_id)
                .await
            {
                warn!(user_id = %user_id, error = %e, "WS mark-read failed");
                return;
            }
            state.dispatcher.push_read(user_id, Some(notification_id));
        }
    }
}
