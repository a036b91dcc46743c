use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::chatmodels::{Conversation, Message, MessageType};

const CONVERSATION_COLUMNS: &str = r#"
    id, user_one_id, user_two_id, created_at, updated_at
"#;

const MESSAGE_COLUMNS: &str = r#"
    id, conversation_id, sender_id, receiver_id, content, message_type,
    file_url, file_name, file_size, is_read, is_deleted, created_at
"#;

/// Order the pair so (a, b) and (b, a) address the same conversation row.
pub fn sorted_pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A conversation needs two distinct participants; the schema enforces the
/// same with a CHECK constraint.
pub fn is_self_conversation(user_id: Uuid, other_user_id: Uuid) -> bool {
    user_id == other_user_id
}

#[async_trait]
pub trait ChatExt {
    async fn get_or_create_conversation(
        &self,
        user_id: Uuid,
        other_user_id: Uuid,
    ) -> Result<Conversation, sqlx::Error>;

    async fn get_conversations_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Conversation>, sqlx::Error>;

    /// Insert the message and bump the conversation timestamp together.
    async fn save_message(
        &self,
        conversation_id: Uuid,
        sender_id: Uuid,
        receiver_id: Uuid,
        content: String,
        message_type: MessageType,
        file_url: Option<String>,
        file_name: Option<String>,
        file_size: Option<i64>,
    ) -> Result<Message, sqlx::Error>;

    async fn get_message_by_id(&self, message_id: Uuid) -> Result<Option<Message>, sqlx::Error>;

    /// Page/limit history with an optional before-message cursor, newest
    /// first; callers reverse for chronological order.
    async fn get_messages(
        &self,
        conversation_id: Uuid,
        limit: i64,
        offset: i64,
        before_message_id: Option<Uuid>,
    ) -> Result<(Vec<Message>, i64), sqlx::Error>;

    async fn get_last_message(
        &self,
        conversation_id: Uuid,
    ) -> Result<Option<Message>, sqlx::Error>;

    async fn mark_messages_as_read(
        &self,
        conversation_id: Uuid,
        reader_id: Uuid,
    ) -> Result<(), sqlx::Error>;

    async fn get_unread_count_in_conversation(
        &self,
        conversation_id: Uuid,
        reader_id: Uuid,
    ) -> Result<i64, sqlx::Error>;

    async fn get_unread_count(&self, user_id: Uuid) -> Result<i64, sqlx::Error>;
}

#[async_trait]
impl ChatExt for DBClient {
    async fn get_or_create_conversation(
        &self,
        user_id: Uuid,
        other_user_id: Uuid,
    ) -> Result<Conversation, sqlx::Error> {
        let (user_one_id, user_two_id) = sorted_pair(user_id, other_user_id);

        let existing = sqlx::query_as::<_, Conversation>(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations
             WHERE user_one_id = $1 AND user_two_id = $2"
        ))
        .bind(user_one_id)
        .bind(user_two_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(conversation) = existing {
            return Ok(conversation);
        }

        sqlx::query_as::<_, Conversation>(&format!(
            "INSERT INTO conversations (user_one_id, user_two_id)
             VALUES ($1, $2)
             RETURNING {CONVERSATION_COLUMNS}"
        ))
        .bind(user_one_id)
        .bind(user_two_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_conversations_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Conversation>, sqlx::Error> {
        sqlx::query_as::<_, Conversation>(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations
             WHERE user_one_id = $1 OR user_two_id = $1
             ORDER BY updated_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn save_message(
        &self,
        conversation_id: Uuid,
        sender_id: Uuid,
        receiver_id: Uuid,
        content: String,
        message_type: MessageType,
        file_url: Option<String>,
        file_name: Option<String>,
        file_size: Option<i64>,
    ) -> Result<Message, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let message = sqlx::query_as::<_, Message>(&format!(
            "INSERT INTO messages
             (conversation_id, sender_id, receiver_id, content, message_type,
              file_url, file_name, file_size)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {MESSAGE_COLUMNS}"
        ))
        .bind(conversation_id)
        .bind(sender_id)
        .bind(receiver_id)
        .bind(content)
        .bind(message_type)
        .bind(file_url)
        .bind(file_name)
        .bind(file_size)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE conversations SET updated_at = NOW() WHERE id = $1")
            .bind(conversation_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(message)
    }

    async fn get_message_by_id(&self, message_id: Uuid) -> Result<Option<Message>, sqlx::Error> {
        sqlx::query_as::<_, Message>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1"
        ))
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_messages(
        &self,
        conversation_id: Uuid,
        limit: i64,
        offset: i64,
        before_message_id: Option<Uuid>,
    ) -> Result<(Vec<Message>, i64), sqlx::Error> {
        // Resolve the cursor to a timestamp; an unknown cursor id is ignored.
        let mut before_created_at = None;
        if let Some(before_id) = before_message_id {
            before_created_at = self
                .get_message_by_id(before_id)
                .await?
                .and_then(|m| m.created_at);
        }

        let messages = sqlx::query_as::<_, Message>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages
             WHERE conversation_id = $1
               AND is_deleted = false
               AND ($2::timestamptz IS NULL OR created_at < $2)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        ))
        .bind(conversation_id)
        .bind(before_created_at)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM messages
             WHERE conversation_id = $1
               AND is_deleted = false
               AND ($2::timestamptz IS NULL OR created_at < $2)",
        )
        .bind(conversation_id)
        .bind(before_created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok((messages, total))
    }

    async fn get_last_message(
        &self,
        conversation_id: Uuid,
    ) -> Result<Option<Message>, sqlx::Error> {
        sqlx::query_as::<_, Message>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages
             WHERE conversation_id = $1 AND is_deleted = false
             ORDER BY created_at DESC
             LIMIT 1"
        ))
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn mark_messages_as_read(
        &self,
        conversation_id: Uuid,
        reader_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE messages SET is_read = true
             WHERE conversation_id = $1 AND receiver_id = $2 AND is_read = false",
        )
        .bind(conversation_id)
        .bind(reader_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_unread_count_in_conversation(
        &self,
        conversation_id: Uuid,
        reader_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM messages
             WHERE conversation_id = $1 AND receiver_id = $2 AND is_read = false",
        )
        .bind(conversation_id)
        .bind(reader_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_unread_count(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM messages WHERE receiver_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_pair_is_order_independent() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert_eq!(sorted_pair(a, b), sorted_pair(b, a));
    }

    #[test]
    fn test_sorted_pair_orders_ascending() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let (first, second) = sorted_pair(a, b);
        assert!(first <= second);
    }

    #[test]
    fn test_messaging_yourself_is_detected() {
        let user = Uuid::new_v4();
        assert!(is_self_conversation(user, user));
        assert!(!is_self_conversation(user, Uuid::new_v4()));
    }
}
