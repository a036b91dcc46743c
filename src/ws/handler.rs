use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query,
    },
    http::{header, HeaderMap},
    response::IntoResponse,
    Extension,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    db::{chatdb, chatdb::ChatExt, userdb::UserExt},
    error::{ErrorMessage, HttpError},
    models::chatmodels::MessageType,
    utils::token,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct WsConnectQuery {
    pub token: Option<String>,
}

/// Client frames are JSON events tagged by name.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum ClientEvent {
    SendMessage {
        receiver_id: Uuid,
        content: String,
        message_type: Option<MessageType>,
        file_url: Option<String>,
        file_name: Option<String>,
        file_size: Option<i64>,
    },
}

fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    // Same extraction order as the HTTP auth middleware: cookie, then bearer.
    if let Some(cookie_header) = headers.get(header::COOKIE).and_then(|h| h.to_str().ok()) {
        if let Some(pair) = cookie_header
            .split(';')
            .map(|s| s.trim())
            .find(|s| s.starts_with("token="))
        {
            return pair.strip_prefix("token=").map(|t| t.to_string());
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}

/// Upgrade handler for the chat gateway. The token is validated during the
/// handshake; a bad token fails the upgrade.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    Query(query): Query<WsConnectQuery>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let token_value = token_from_headers(&headers)
        .or(query.token)
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::TokenNotProvided.to_string()))?;

    let user_id_str = token::decode_token(token_value, app_state.env.jwt_secret.as_bytes())?;

    let user_id = Uuid::parse_str(&user_id_str)
        .map_err(|_| HttpError::unauthorized(ErrorMessage::InvalidToken.to_string()))?;

    let user = app_state
        .db_client
        .get_user(Some(user_id), None, None)
        .await
        .map_err(|_| HttpError::unauthorized(ErrorMessage::UserNoLongerExist.to_string()))?
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::UserNoLongerExist.to_string()))?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, app_state, user.id)))
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>, user_id: Uuid) {
    let socket_id = Uuid::new_v4().to_string();
    tracing::info!(user_id = %user_id, socket_id = %socket_id, "User connected to chat gateway");

    let mut rx = app_state.gateway.register(socket_id.clone(), user_id).await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward gateway frames to the WebSocket sink.
    let sender_socket_id = socket_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(socket_id = %sender_socket_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: dispatch inbound events.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if let Err(e) = handle_client_event(&app_state, user_id, &text).await {
                    tracing::warn!(user_id = %user_id, "Chat event rejected: {}", e.message);
                    let _ = app_state
                        .gateway
                        .emit_to_user(
                            user_id,
                            &serde_json::json!({
                                "event": "error",
                                "message": e.message,
                            }),
                        )
                        .await;
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(socket_id = %socket_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    app_state.gateway.unregister(&socket_id).await;
    send_task.abort();
    tracing::info!(user_id = %user_id, socket_id = %socket_id, "User disconnected from chat gateway");
}

/// Persist the message, then emit it to the receiver's socket if they are
/// online. Persistence happens regardless of delivery.
async fn handle_client_event(
    app_state: &Arc<AppState>,
    sender_id: Uuid,
    raw: &str,
) -> Result<(), HttpError> {
    let event: ClientEvent = serde_json::from_str(raw)
        .map_err(|_| HttpError::bad_request("Unrecognized chat event"))?;

    match event {
        ClientEvent::SendMessage {
            receiver_id,
            content,
            message_type,
            file_url,
            file_name,
            file_size,
        } => {
            if chatdb::is_self_conversation(sender_id, receiver_id) {
                return Err(HttpError::bad_request("Cannot message yourself"));
            }

            let receiver = app_state
                .db_client
                .get_user(Some(receiver_id), None, None)
                .await
                .map_err(|e| HttpError::server_error(e.to_string()))?
                .ok_or_else(|| HttpError::not_found("Receiver not found"))?;

            let conversation = app_state
                .db_client
                .get_or_create_conversation(sender_id, receiver.id)
                .await
                .map_err(|e| HttpError::server_error(e.to_string()))?;

            let message = app_state
                .db_client
                .save_message(
                    conversation.id,
                    sender_id,
                    receiver.id,
                    content,
                    message_type.unwrap_or(MessageType::Text),
                    file_url,
                    file_name,
                    file_size,
                )
                .await
                .map_err(|e| HttpError::server_error(e.to_string()))?;

            let delivered = app_state
                .gateway
                .emit_to_user(
                    receiver.id,
                    &serde_json::json!({
                        "event": "receive_message",
                        "data": message,
                    }),
                )
                .await;

            tracing::info!(
                sender_id = %sender_id,
                receiver_id = %receiver.id,
                delivered,
                "Chat message persisted"
            );

            Ok(())
        }
    }
}
