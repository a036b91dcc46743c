use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::chatmodels::{Conversation, Message, MessageType};

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageDto {
    pub receiver_id: Uuid,

    #[validate(length(min = 1, max = 5000, message = "Message must be between 1 and 5000 characters"))]
    pub content: String,

    pub message_type: Option<MessageType>,

    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GetMessagesQuery {
    pub other_user_id: Uuid,

    #[validate(range(min = 1))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,

    /// Cursor: only messages created before this one are returned.
    pub before_message_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Clone)]
pub struct ChatParticipant {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConversationWithDetails {
    pub conversation: Conversation,
    pub other_user: ChatParticipant,
    pub last_message: Option<Message>,
    pub unread_count: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageHistoryResponse {
    pub messages: Vec<Message>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub has_more: bool,
    pub conversation_id: Uuid,
}
