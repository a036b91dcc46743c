use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::{catalogdb::CatalogExt, db::DBClient, jobdb::JobExt, providerdb::ProviderExt},
    dtos::jobdtos::CreateJobDto,
    models::jobmodel::{Bid, BidStatus, Job},
    service::{error::ServiceError, notification_service::NotificationService},
};

/// A consumer may accept a bid only on their own open job, and only once.
pub fn ensure_bid_acceptable(job: &Job, bid: &Bid, consumer_id: Uuid) -> Result<(), ServiceError> {
    if job.consumer_id != consumer_id {
        return Err(ServiceError::UnauthorizedJobAccess(consumer_id, job.id));
    }

    if bid.status == Some(BidStatus::Accepted) {
        return Err(ServiceError::BidAlreadyAccepted);
    }

    if job.assigned_service_provider_id.is_some() {
        return Err(ServiceError::JobAlreadyAssigned);
    }

    Ok(())
}

/// Consumer-side completion guard: owner only, job must be assigned, and the
/// consumer flag must not already be set.
pub fn ensure_consumer_completion(job: &Job, consumer_id: Uuid) -> Result<(), ServiceError> {
    if job.consumer_id != consumer_id {
        return Err(ServiceError::UnauthorizedJobAccess(consumer_id, job.id));
    }

    if job.assigned_service_provider_id.is_none() {
        return Err(ServiceError::JobNotAssigned);
    }

    if job.is_complete_from_consumer.unwrap_or(false) {
        return Err(ServiceError::AlreadyComplete);
    }

    Ok(())
}

/// Provider-side completion guard: the job must be assigned to this provider
/// and the provider flag must not already be set.
pub fn ensure_provider_completion(job: &Job, provider_id: Uuid) -> Result<(), ServiceError> {
    if job.assigned_service_provider_id != Some(provider_id) {
        return Err(ServiceError::UnauthorizedJobAccess(provider_id, job.id));
    }

    if job.is_completed_from_service_provider.unwrap_or(false) {
        return Err(ServiceError::AlreadyComplete);
    }

    Ok(())
}

#[derive(Clone)]
pub struct JobService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
}

impl JobService {
    pub fn new(db_client: Arc<DBClient>, notification_service: Arc<NotificationService>) -> Self {
        Self {
            db_client,
            notification_service,
        }
    }

    /// Create a job after validating its catalog references.
    pub async fn create_job(
        &self,
        consumer_id: Uuid,
        body: CreateJobDto,
    ) -> Result<Job, ServiceError> {
        tracing::info!(consumer_id = %consumer_id, "Create job request received");

        let area = self
            .db_client
            .get_area_by_id(body.area_id)
            .await?
            .ok_or_else(|| ServiceError::Validation("Area does not exist".to_string()))?;

        let category = self
            .db_client
            .get_service_category_by_id(body.category_id)
            .await?
            .ok_or_else(|| ServiceError::Validation("Service does not exist".to_string()))?;

        let sub_service = self
            .db_client
            .get_sub_service_by_id(body.sub_service_id)
            .await?
            .ok_or_else(|| {
                ServiceError::Validation(
                    "Sub-service does not exist under the specified service".to_string(),
                )
            })?;

        if sub_service.category_id != category.id {
            return Err(ServiceError::Validation(
                "Sub-service does not exist under the specified service".to_string(),
            ));
        }

        let job = self
            .db_client
            .create_job(
                consumer_id,
                category.id,
                sub_service.id,
                area.id,
                body.description,
                body.budget,
                body.start_time,
                body.end_time,
                body.tools_needed,
                body.images.unwrap_or_default(),
            )
            .await?;

        tracing::info!(job_id = %job.id, "Job created successfully");

        Ok(job)
    }

    /// A provider places a priced offer against a job. One bid per
    /// (job, provider) pair; no bidding on your own posting.
    pub async fn place_bid(
        &self,
        provider_user_id: Uuid,
        job_id: Uuid,
        price: f64,
        proposal: String,
    ) -> Result<Bid, ServiceError> {
        let provider = self
            .db_client
            .get_provider_by_user(provider_user_id)
            .await?
            .ok_or(ServiceError::ProviderProfileNotFound(provider_user_id))?;

        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if job.consumer_id == provider_user_id {
            return Err(ServiceError::Validation(
                "You cannot bid on your own job".to_string(),
            ));
        }

        let existing = self
            .db_client
            .get_bid_for_job_and_provider(job_id, provider.id)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::DuplicateBid);
        }

        let bid = self
            .db_client
            .create_bid(job_id, provider.id, job.consumer_id, price, proposal)
            .await?;

        tracing::info!(
            bid_id = %bid.id,
            job_id = %job_id,
            provider_id = %provider.id,
            "Bid placed successfully"
        );

        let _ = self
            .notification_service
            .notify_new_bid(provider_user_id, job.consumer_id, &job)
            .await;

        Ok(bid)
    }

    /// The acceptance step: flips the chosen bid to accepted and assigns the
    /// provider on the job in one transaction.
    pub async fn accept_bid(
        &self,
        consumer_id: Uuid,
        job_id: Uuid,
        service_provider_id: Uuid,
    ) -> Result<(Bid, Job), ServiceError> {
        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        let bid = self
            .db_client
            .get_bid_for_job_and_provider(job_id, service_provider_id)
            .await?
            .ok_or_else(|| {
                ServiceError::Validation(
                    "No bid from this service provider on this job".to_string(),
                )
            })?;

        ensure_bid_acceptable(&job, &bid, consumer_id)?;

        if self.db_client.get_accepted_bid_for_job(job_id).await?.is_some() {
            return Err(ServiceError::JobAlreadyAssigned);
        }

        let (bid, job) = self.db_client.accept_bid(bid.id, job_id).await?;

        tracing::info!(
            job_id = %job.id,
            bid_id = %bid.id,
            "Bid accepted and provider assigned"
        );

        if let Some(provider) = self
            .db_client
            .get_provider_by_id(bid.service_provider_id)
            .await?
        {
            let _ = self
                .notification_service
                .notify_bid_accepted(consumer_id, provider.user_id, &job)
                .await;
        }

        Ok((bid, job))
    }

    /// Consumer flags their side of completion.
    pub async fn complete_from_consumer(
        &self,
        consumer_id: Uuid,
        job_id: Uuid,
    ) -> Result<Job, ServiceError> {
        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        ensure_consumer_completion(&job, consumer_id)?;

        let job = self.db_client.set_consumer_complete(job_id).await?;

        if let Some(provider_id) = job.assigned_service_provider_id {
            if let Some(provider) = self.db_client.get_provider_by_id(provider_id).await? {
                let _ = self
                    .notification_service
                    .notify_consumer_completed(consumer_id, provider.user_id, &job)
                    .await;
            }
        }

        Ok(job)
    }

    /// Provider flags their side of completion.
    pub async fn complete_from_provider(
        &self,
        provider_user_id: Uuid,
        job_id: Uuid,
    ) -> Result<Job, ServiceError> {
        let provider = self
            .db_client
            .get_provider_by_user(provider_user_id)
            .await?
            .ok_or(ServiceError::ProviderProfileNotFound(provider_user_id))?;

        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        ensure_provider_completion(&job, provider.id)?;

        let job = self.db_client.set_provider_complete(job_id).await?;

        let _ = self
            .notification_service
            .notify_provider_completed(provider_user_id, job.consumer_id, &job)
            .await;

        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::types::BigDecimal;

    fn test_job(consumer_id: Uuid) -> Job {
        Job {
            id: Uuid::new_v4(),
            consumer_id,
            category_id: Uuid::new_v4(),
            sub_service_id: Uuid::new_v4(),
            area_id: Uuid::new_v4(),
            description: "Paint a 3-room apartment".to_string(),
            budget: BigDecimal::from(15000),
            start_time: Utc::now(),
            end_time: Utc::now(),
            tools_needed: Some(true),
            images: None,
            assigned_service_provider_id: None,
            is_complete_from_consumer: Some(false),
            is_completed_from_service_provider: Some(false),
            is_delete_request_to_admin: Some(false),
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    fn test_bid(job: &Job, provider_id: Uuid, status: BidStatus) -> Bid {
        Bid {
            id: Uuid::new_v4(),
            job_id: job.id,
            service_provider_id: provider_id,
            consumer_id: job.consumer_id,
            price: BigDecimal::from(5000),
            proposal: "I will complete the task within 3 days".to_string(),
            status: Some(status),
            created_at: Some(Utc::now()),
        }
    }

    #[test]
    fn accepting_a_bid_twice_fails() {
        let consumer_id = Uuid::new_v4();
        let provider_id = Uuid::new_v4();
        let mut job = test_job(consumer_id);

        // First acceptance passes the guard.
        let pending = test_bid(&job, provider_id, BidStatus::Pending);
        assert!(ensure_bid_acceptable(&job, &pending, consumer_id).is_ok());

        // After acceptance both the bid status and the assignment block a
        // second attempt.
        job.assigned_service_provider_id = Some(provider_id);
        let accepted = test_bid(&job, provider_id, BidStatus::Accepted);
        assert!(matches!(
            ensure_bid_acceptable(&job, &accepted, consumer_id),
            Err(ServiceError::BidAlreadyAccepted)
        ));
    }

    #[test]
    fn accepting_on_anothers_job_fails() {
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let job = test_job(owner);
        let bid = test_bid(&job, Uuid::new_v4(), BidStatus::Pending);

        assert!(matches!(
            ensure_bid_acceptable(&job, &bid, intruder),
            Err(ServiceError::UnauthorizedJobAccess(_, _))
        ));
    }

    #[test]
    fn second_accepted_bid_on_same_job_fails() {
        let consumer_id = Uuid::new_v4();
        let mut job = test_job(consumer_id);
        job.assigned_service_provider_id = Some(Uuid::new_v4());

        // A different provider's still-pending bid cannot be accepted once
        // the job is assigned.
        let other_bid = test_bid(&job, Uuid::new_v4(), BidStatus::Pending);
        assert!(matches!(
            ensure_bid_acceptable(&job, &other_bid, consumer_id),
            Err(ServiceError::JobAlreadyAssigned)
        ));
    }

    #[test]
    fn consumer_completion_is_idempotent_guarded() {
        let consumer_id = Uuid::new_v4();
        let mut job = test_job(consumer_id);
        job.assigned_service_provider_id = Some(Uuid::new_v4());

        assert!(ensure_consumer_completion(&job, consumer_id).is_ok());

        job.is_complete_from_consumer = Some(true);
        assert!(matches!(
            ensure_consumer_completion(&job, consumer_id),
            Err(ServiceError::AlreadyComplete)
        ));
    }

    #[test]
    fn consumer_completion_requires_assignment() {
        let consumer_id = Uuid::new_v4();
        let job = test_job(consumer_id);

        assert!(matches!(
            ensure_consumer_completion(&job, consumer_id),
            Err(ServiceError::JobNotAssigned)
        ));
    }

    #[test]
    fn provider_completion_is_idempotent_guarded() {
        let provider_id = Uuid::new_v4();
        let mut job = test_job(Uuid::new_v4());
        job.assigned_service_provider_id = Some(provider_id);

        assert!(ensure_provider_completion(&job, provider_id).is_ok());

        job.is_completed_from_service_provider = Some(true);
        assert!(matches!(
            ensure_provider_completion(&job, provider_id),
            Err(ServiceError::AlreadyComplete)
        ));
    }

    #[test]
    fn provider_completion_requires_being_assigned() {
        let mut job = test_job(Uuid::new_v4());
        job.assigned_service_provider_id = Some(Uuid::new_v4());

        let someone_else = Uuid::new_v4();
        assert!(matches!(
            ensure_provider_completion(&job, someone_else),
            Err(ServiceError::UnauthorizedJobAccess(_, _))
        ));
    }

    #[test]
    fn both_flags_mark_the_job_done() {
        let mut job = test_job(Uuid::new_v4());
        assert!(!job.is_done());

        job.is_completed_from_service_provider = Some(true);
        assert!(!job.is_done());

        job.is_complete_from_consumer = Some(true);
        assert!(job.is_done());
    }
}
