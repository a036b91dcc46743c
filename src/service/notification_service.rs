use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, notificationdb::NotificationExt},
    models::jobmodel::{Dispute, Job},
    service::error::ServiceError,
    ws::gateway::ChatGateway,
};

/// Stores notification rows and pushes them to the receiver's socket when
/// they are online. Persistence does not depend on delivery.
#[derive(Clone)]
pub struct NotificationService {
    db_client: Arc<DBClient>,
    gateway: Arc<ChatGateway>,
}

impl NotificationService {
    pub fn new(db_client: Arc<DBClient>, gateway: Arc<ChatGateway>) -> Self {
        Self { db_client, gateway }
    }

    async fn notify(
        &self,
        from_user: Option<Uuid>,
        to_user: Uuid,
        job_id: Option<Uuid>,
        message: String,
    ) -> Result<(), ServiceError> {
        let notification = self
            .db_client
            .store_notification(from_user, to_user, job_id, message)
            .await?;

        let delivered = self
            .gateway
            .emit_to_user(
                to_user,
                &serde_json::json!({
                    "event": "new_notification",
                    "data": notification,
                }),
            )
            .await;

        tracing::info!(
            to_user = %to_user,
            delivered,
            "Notification stored: {}",
            notification.message
        );

        Ok(())
    }

    pub async fn notify_new_bid(
        &self,
        provider_user_id: Uuid,
        consumer_id: Uuid,
        job: &Job,
    ) -> Result<(), ServiceError> {
        self.notify(
            Some(provider_user_id),
            consumer_id,
            Some(job.id),
            "You have received a new bid on your job".to_string(),
        )
        .await
    }

    pub async fn notify_bid_accepted(
        &self,
        consumer_id: Uuid,
        provider_user_id: Uuid,
        job: &Job,
    ) -> Result<(), ServiceError> {
        self.notify(
            Some(consumer_id),
            provider_user_id,
            Some(job.id),
            "Your bid has been accepted".to_string(),
        )
        .await
    }

    pub async fn notify_provider_completed(
        &self,
        provider_user_id: Uuid,
        consumer_id: Uuid,
        job: &Job,
    ) -> Result<(), ServiceError> {
        self.notify(
            Some(provider_user_id),
            consumer_id,
            Some(job.id),
            format!(
                "Job {} has been completed! Please review and confirm.",
                job.id
            ),
        )
        .await
    }

    pub async fn notify_consumer_completed(
        &self,
        consumer_id: Uuid,
        provider_user_id: Uuid,
        job: &Job,
    ) -> Result<(), ServiceError> {
        self.notify(
            Some(consumer_id),
            provider_user_id,
            Some(job.id),
            format!("Job {} has been confirmed by the consumer.", job.id),
        )
        .await
    }

    pub async fn notify_new_message(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<(), ServiceError> {
        self.notify(
            Some(sender_id),
            receiver_id,
            None,
            "You have a new message".to_string(),
        )
        .await
    }

    pub async fn notify_dispute_raised(&self, dispute: &Dispute) -> Result<(), ServiceError> {
        self.notify(
            Some(dispute.raised_by),
            dispute.against,
            Some(dispute.job_id),
            "A dispute has been raised against you".to_string(),
        )
        .await
    }

    pub async fn notify_dispute_resolved(&self, dispute: &Dispute) -> Result<(), ServiceError> {
        // Both parties hear about the resolution.
        self.notify(
            None,
            dispute.raised_by,
            Some(dispute.job_id),
            format!("Dispute for job {} has been resolved.", dispute.job_id),
        )
        .await?;

        self.notify(
            None,
            dispute.against,
            Some(dispute.job_id),
            format!("Dispute for job {} has been resolved.", dispute.job_id),
        )
        .await
    }
}
