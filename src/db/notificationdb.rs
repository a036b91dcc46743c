use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::chatmodels::Notification;

const NOTIFICATION_COLUMNS: &str = r#"
    id, from_user, to_user, job_id, message, is_read, created_at
"#;

#[async_trait]
pub trait NotificationExt {
    async fn store_notification(
        &self,
        from_user: Option<Uuid>,
        to_user: Uuid,
        job_id: Option<Uuid>,
        message: String,
    ) -> Result<Notification, sqlx::Error>;

    async fn get_notifications_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error>;

    async fn mark_notification_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> Result<Notification, sqlx::Error>;
}

#[async_trait]
impl NotificationExt for DBClient {
    async fn store_notification(
        &self,
        from_user: Option<Uuid>,
        to_user: Uuid,
        job_id: Option<Uuid>,
        message: String,
    ) -> Result<Notification, sqlx::Error> {
        sqlx::query_as::<_, Notification>(&format!(
            "INSERT INTO notifications (from_user, to_user, job_id, message)
             VALUES ($1, $2, $3, $4)
             RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(from_user)
        .bind(to_user)
        .bind(job_id)
        .bind(message)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_notifications_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications
             WHERE to_user = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn mark_notification_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> Result<Notification, sqlx::Error> {
        sqlx::query_as::<_, Notification>(&format!(
            "UPDATE notifications SET is_read = true
             WHERE id = $1 AND to_user = $2
             RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(notification_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }
}
