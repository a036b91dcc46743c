use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{chatdb, chatdb::ChatExt, notificationdb::NotificationExt, userdb::UserExt},
    dtos::chatdtos::*,
    dtos::jobdtos::ApiResponse,
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::chatmodels::MessageType,
    ws::handler::ws_handler,
    AppState,
};

pub fn chat_handler() -> Router {
    Router::new()
        .route("/conversations", get(get_conversations))
        .route("/messages", get(get_messages).post(send_message))
        .route("/conversations/:conversation_id/read", put(mark_conversation_read))
        .route("/unread-count", get(get_unread_count))
        .route("/notifications", get(get_notifications))
        .route("/notifications/:notification_id/read", put(mark_notification_read))
}

/// The WebSocket endpoint lives outside the auth middleware; the gateway
/// validates the token during the handshake itself.
pub fn chat_ws_handler() -> Router {
    Router::new().route("/ws", get(ws_handler))
}

pub async fn get_conversations(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let conversations = app_state
        .db_client
        .get_conversations_for_user(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let mut details = Vec::new();

    for conversation in conversations {
        let other_user_id = conversation.other_participant(auth.user.id);

        let other_user = app_state
            .db_client
            .get_user(Some(other_user_id), None, None)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?
            .ok_or_else(|| HttpError::not_found("User not found"))?;

        let last_message = app_state
            .db_client
            .get_last_message(conversation.id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;

        let unread_count = app_state
            .db_client
            .get_unread_count_in_conversation(conversation.id, auth.user.id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;

        details.push(ConversationWithDetails {
            conversation,
            other_user: ChatParticipant {
                id: other_user.id,
                name: other_user.name,
                email: other_user.email,
                picture: other_user.picture,
            },
            last_message,
            unread_count,
        });
    }

    Ok(Json(ApiResponse::success(
        "Conversations retrieved successfully",
        details,
    )))
}

pub async fn send_message(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<SendMessageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if chatdb::is_self_conversation(auth.user.id, body.receiver_id) {
        return Err(HttpError::bad_request("Cannot message yourself"));
    }

    let receiver = app_state
        .db_client
        .get_user(Some(body.receiver_id), None, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Receiver not found"))?;

    let conversation = app_state
        .db_client
        .get_or_create_conversation(auth.user.id, receiver.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let message = app_state
        .db_client
        .save_message(
            conversation.id,
            auth.user.id,
            receiver.id,
            body.content,
            body.message_type.unwrap_or(MessageType::Text),
            body.file_url,
            body.file_name,
            body.file_size,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    // Same delivery path as the gateway: direct emit if online, persisted
    // either way.
    let _ = app_state
        .gateway
        .emit_to_user(
            receiver.id,
            &serde_json::json!({
                "event": "receive_message",
                "data": message,
            }),
        )
        .await;

    let _ = app_state
        .notification_service
        .notify_new_message(auth.user.id, receiver.id)
        .await;

    Ok(Json(ApiResponse::success(
        "Message sent successfully",
        message,
    )))
}

pub async fn get_messages(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(query): Query<GetMessagesQuery>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if chatdb::is_self_conversation(auth.user.id, query.other_user_id) {
        return Err(HttpError::bad_request(
            "Cannot create conversation with yourself",
        ));
    }

    let other_user = app_state
        .db_client
        .get_user(Some(query.other_user_id), None, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("User not found"))?;

    let conversation = app_state
        .db_client
        .get_or_create_conversation(auth.user.id, other_user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(50) as i64;
    let offset = ((page - 1) * limit as u32) as i64;

    let (mut messages, total) = app_state
        .db_client
        .get_messages(conversation.id, limit, offset, query.before_message_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let has_more = offset + (messages.len() as i64) < total;

    // Fetched newest-first; hand back in chronological order.
    messages.reverse();

    Ok(Json(ApiResponse::success(
        "Messages retrieved successfully",
        MessageHistoryResponse {
            messages,
            total,
            page,
            limit: limit as u32,
            has_more,
            conversation_id: conversation.id,
        },
    )))
}

pub async fn mark_conversation_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(conversation_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .db_client
        .mark_messages_as_read(conversation_id, auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success("Messages marked as read", ())))
}

pub async fn get_unread_count(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let count = app_state
        .db_client
        .get_unread_count(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Unread count retrieved successfully",
        serde_json::json!({ "unread_count": count }),
    )))
}

#[derive(Debug, serde::Deserialize)]
pub struct NotificationQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

pub async fn get_notifications(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(query): Query<NotificationQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(20) as i64;
    let offset = ((page - 1) * limit as u32) as i64;

    let notifications = app_state
        .db_client
        .get_notifications_for_user(auth.user.id, limit, offset)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Notifications retrieved successfully",
        notifications,
    )))
}

pub async fn mark_notification_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(notification_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let notification = app_state
        .db_client
        .mark_notification_read(notification_id, auth.user.id)
        .await
        .map_err(|_| HttpError::not_found("Notification not found"))?;

    Ok(Json(ApiResponse::success(
        "Notification marked as read",
        notification,
    )))
}
