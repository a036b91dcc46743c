use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::BigDecimal;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::jobmodel::{Bid, BidStatus, Job};

const JOB_COLUMNS: &str = r#"
    id, consumer_id, category_id, sub_service_id, area_id, description, budget,
    start_time, end_time, tools_needed, images, assigned_service_provider_id,
    is_complete_from_consumer, is_completed_from_service_provider,
    is_delete_request_to_admin, created_at, updated_at
"#;

const BID_COLUMNS: &str = r#"
    id, job_id, service_provider_id, consumer_id, price, proposal, status, created_at
"#;

#[async_trait]
pub trait JobExt {
    async fn create_job(
        &self,
        consumer_id: Uuid,
        category_id: Uuid,
        sub_service_id: Uuid,
        area_id: Uuid,
        description: String,
        budget: f64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        tools_needed: bool,
        images: Vec<String>,
    ) -> Result<Job, sqlx::Error>;

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, sqlx::Error>;

    async fn get_jobs(&self, page: u32, limit: usize) -> Result<Vec<Job>, sqlx::Error>;

    async fn get_jobs_by_consumer(&self, consumer_id: Uuid) -> Result<Vec<Job>, sqlx::Error>;

    async fn update_job(
        &self,
        job_id: Uuid,
        description: Option<String>,
        budget: Option<f64>,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
        tools_needed: Option<bool>,
        images: Option<Vec<String>>,
    ) -> Result<Job, sqlx::Error>;

    /// Consumers never hard-delete; they flag the job for admin review.
    async fn request_job_deletion(&self, job_id: Uuid) -> Result<Job, sqlx::Error>;

    async fn delete_job(&self, job_id: Uuid) -> Result<(), sqlx::Error>;

    // Bidding
    async fn create_bid(
        &self,
        job_id: Uuid,
        service_provider_id: Uuid,
        consumer_id: Uuid,
        price: f64,
        proposal: String,
    ) -> Result<Bid, sqlx::Error>;

    async fn get_bid_by_id(&self, bid_id: Uuid) -> Result<Option<Bid>, sqlx::Error>;

    async fn get_bid_for_job_and_provider(
        &self,
        job_id: Uuid,
        service_provider_id: Uuid,
    ) -> Result<Option<Bid>, sqlx::Error>;

    async fn get_bids_for_job(&self, job_id: Uuid) -> Result<Vec<Bid>, sqlx::Error>;

    async fn get_accepted_bid_for_job(&self, job_id: Uuid) -> Result<Option<Bid>, sqlx::Error>;

    async fn get_bids_by_provider(
        &self,
        service_provider_id: Uuid,
    ) -> Result<Vec<Bid>, sqlx::Error>;

    /// Accepted bids whose job both sides have flagged complete.
    async fn get_completed_accepted_bids_by_provider(
        &self,
        service_provider_id: Uuid,
    ) -> Result<Vec<Bid>, sqlx::Error>;

    /// Flip the bid to accepted and assign the provider on the job in a
    /// single transaction.
    async fn accept_bid(&self, bid_id: Uuid, job_id: Uuid) -> Result<(Bid, Job), sqlx::Error>;

    async fn set_consumer_complete(&self, job_id: Uuid) -> Result<Job, sqlx::Error>;

    async fn set_provider_complete(&self, job_id: Uuid) -> Result<Job, sqlx::Error>;
}

#[async_trait]
impl JobExt for DBClient {
    async fn create_job(
        &self,
        consumer_id: Uuid,
        category_id: Uuid,
        sub_service_id: Uuid,
        area_id: Uuid,
        description: String,
        budget: f64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        tools_needed: bool,
        images: Vec<String>,
    ) -> Result<Job, sqlx::Error> {
        let budget_bd = BigDecimal::try_from(budget).unwrap_or_default();

        sqlx::query_as::<_, Job>(&format!(
            "INSERT INTO jobs
             (consumer_id, category_id, sub_service_id, area_id, description, budget,
              start_time, end_time, tools_needed, images)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(consumer_id)
        .bind(category_id)
        .bind(sub_service_id)
        .bind(area_id)
        .bind(description)
        .bind(budget_bd)
        .bind(start_time)
        .bind(end_time)
        .bind(tools_needed)
        .bind(images)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, sqlx::Error> {
        sqlx::query_as::<_, Job>(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_jobs(&self, page: u32, limit: usize) -> Result<Vec<Job>, sqlx::Error> {
        let offset = (page.max(1) - 1) as i64 * limit as i64;

        sqlx::query_as::<_, Job>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        ))
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_jobs_by_consumer(&self, consumer_id: Uuid) -> Result<Vec<Job>, sqlx::Error> {
        sqlx::query_as::<_, Job>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs
             WHERE consumer_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(consumer_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_job(
        &self,
        job_id: Uuid,
        description: Option<String>,
        budget: Option<f64>,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
        tools_needed: Option<bool>,
        images: Option<Vec<String>>,
    ) -> Result<Job, sqlx::Error> {
        let budget_bd = budget.and_then(|b| BigDecimal::try_from(b).ok());

        sqlx::query_as::<_, Job>(&format!(
            "UPDATE jobs SET
                description = COALESCE($2, description),
                budget = COALESCE($3, budget),
                start_time = COALESCE($4, start_time),
                end_time = COALESCE($5, end_time),
                tools_needed = COALESCE($6, tools_needed),
                images = COALESCE($7, images),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(job_id)
        .bind(description)
        .bind(budget_bd)
        .bind(start_time)
        .bind(end_time)
        .bind(tools_needed)
        .bind(images)
        .fetch_one(&self.pool)
        .await
    }

    async fn request_job_deletion(&self, job_id: Uuid) -> Result<Job, sqlx::Error> {
        sqlx::query_as::<_, Job>(&format!(
            "UPDATE jobs SET is_delete_request_to_admin = true, updated_at = NOW()
             WHERE id = $1
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(job_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_job(&self, job_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(job_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create_bid(
        &self,
        job_id: Uuid,
        service_provider_id: Uuid,
        consumer_id: Uuid,
        price: f64,
        proposal: String,
    ) -> Result<Bid, sqlx::Error> {
        let price_bd = BigDecimal::try_from(price).unwrap_or_default();

        sqlx::query_as::<_, Bid>(&format!(
            "INSERT INTO bids (job_id, service_provider_id, consumer_id, price, proposal)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {BID_COLUMNS}"
        ))
        .bind(job_id)
        .bind(service_provider_id)
        .bind(consumer_id)
        .bind(price_bd)
        .bind(proposal)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_bid_by_id(&self, bid_id: Uuid) -> Result<Option<Bid>, sqlx::Error> {
        sqlx::query_as::<_, Bid>(&format!("SELECT {BID_COLUMNS} FROM bids WHERE id = $1"))
            .bind(bid_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_bid_for_job_and_provider(
        &self,
        job_id: Uuid,
        service_provider_id: Uuid,
    ) -> Result<Option<Bid>, sqlx::Error> {
        sqlx::query_as::<_, Bid>(&format!(
            "SELECT {BID_COLUMNS} FROM bids
             WHERE job_id = $1 AND service_provider_id = $2"
        ))
        .bind(job_id)
        .bind(service_provider_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_bids_for_job(&self, job_id: Uuid) -> Result<Vec<Bid>, sqlx::Error> {
        sqlx::query_as::<_, Bid>(&format!(
            "SELECT {BID_COLUMNS} FROM bids
             WHERE job_id = $1
             ORDER BY created_at ASC"
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_accepted_bid_for_job(&self, job_id: Uuid) -> Result<Option<Bid>, sqlx::Error> {
        sqlx::query_as::<_, Bid>(&format!(
            "SELECT {BID_COLUMNS} FROM bids
             WHERE job_id = $1 AND status = 'accepted'::bid_status"
        ))
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_bids_by_provider(
        &self,
        service_provider_id: Uuid,
    ) -> Result<Vec<Bid>, sqlx::Error> {
        sqlx::query_as::<_, Bid>(&format!(
            "SELECT {BID_COLUMNS} FROM bids
             WHERE service_provider_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(service_provider_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_completed_accepted_bids_by_provider(
        &self,
        service_provider_id: Uuid,
    ) -> Result<Vec<Bid>, sqlx::Error> {
        sqlx::query_as::<_, Bid>(
            r#"
            SELECT b.id, b.job_id, b.service_provider_id, b.consumer_id,
                   b.price, b.proposal, b.status, b.created_at
            FROM bids b
            JOIN jobs j ON j.id = b.job_id
            WHERE b.service_provider_id = $1
              AND b.status = 'accepted'::bid_status
              AND j.is_complete_from_consumer = true
              AND j.is_completed_from_service_provider = true
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(service_provider_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn accept_bid(&self, bid_id: Uuid, job_id: Uuid) -> Result<(Bid, Job), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let bid = sqlx::query_as::<_, Bid>(&format!(
            "UPDATE bids SET status = 'accepted'::bid_status
             WHERE id = $1
             RETURNING {BID_COLUMNS}"
        ))
        .bind(bid_id)
        .fetch_one(&mut *tx)
        .await?;

        let job = sqlx::query_as::<_, Job>(&format!(
            "UPDATE jobs SET assigned_service_provider_id = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(job_id)
        .bind(bid.service_provider_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((bid, job))
    }

    async fn set_consumer_complete(&self, job_id: Uuid) -> Result<Job, sqlx::Error> {
        sqlx::query_as::<_, Job>(&format!(
            "UPDATE jobs SET is_complete_from_consumer = true, updated_at = NOW()
             WHERE id = $1
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(job_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_provider_complete(&self, job_id: Uuid) -> Result<Job, sqlx::Error> {
        sqlx::query_as::<_, Job>(&format!(
            "UPDATE jobs SET is_completed_from_service_provider = true, updated_at = NOW()
             WHERE id = $1
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(job_id)
        .fetch_one(&self.pool)
        .await
    }
}
