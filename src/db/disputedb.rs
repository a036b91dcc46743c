use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::jobmodel::Dispute;

const DISPUTE_COLUMNS: &str = r#"
    id, bid_id, job_id, raised_by, against, reason, pictures, is_solved,
    created_at, resolved_at
"#;

#[async_trait]
pub trait DisputeExt {
    async fn create_dispute(
        &self,
        bid_id: Uuid,
        job_id: Uuid,
        raised_by: Uuid,
        against: Uuid,
        reason: String,
        pictures: Vec<String>,
    ) -> Result<Dispute, sqlx::Error>;

    async fn get_dispute_by_id(&self, dispute_id: Uuid) -> Result<Option<Dispute>, sqlx::Error>;

    async fn get_disputes(&self, page: u32, limit: usize) -> Result<Vec<Dispute>, sqlx::Error>;

    async fn get_disputes_for_user(&self, user_id: Uuid) -> Result<Vec<Dispute>, sqlx::Error>;

    async fn resolve_dispute(&self, dispute_id: Uuid) -> Result<Dispute, sqlx::Error>;
}

#[async_trait]
impl DisputeExt for DBClient {
    async fn create_dispute(
        &self,
        bid_id: Uuid,
        job_id: Uuid,
        raised_by: Uuid,
        against: Uuid,
        reason: String,
        pictures: Vec<String>,
    ) -> Result<Dispute, sqlx::Error> {
        sqlx::query_as::<_, Dispute>(&format!(
            "INSERT INTO disputes (bid_id, job_id, raised_by, against, reason, pictures)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {DISPUTE_COLUMNS}"
        ))
        .bind(bid_id)
        .bind(job_id)
        .bind(raised_by)
        .bind(against)
        .bind(reason)
        .bind(pictures)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_dispute_by_id(&self, dispute_id: Uuid) -> Result<Option<Dispute>, sqlx::Error> {
        sqlx::query_as::<_, Dispute>(&format!(
            "SELECT {DISPUTE_COLUMNS} FROM disputes WHERE id = $1"
        ))
        .bind(dispute_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_disputes(&self, page: u32, limit: usize) -> Result<Vec<Dispute>, sqlx::Error> {
        let offset = (page.max(1) - 1) as i64 * limit as i64;

        sqlx::query_as::<_, Dispute>(&format!(
            "SELECT {DISPUTE_COLUMNS} FROM disputes
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        ))
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_disputes_for_user(&self, user_id: Uuid) -> Result<Vec<Dispute>, sqlx::Error> {
        sqlx::query_as::<_, Dispute>(&format!(
            "SELECT {DISPUTE_COLUMNS} FROM disputes
             WHERE raised_by = $1 OR against = $1
             ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn resolve_dispute(&self, dispute_id: Uuid) -> Result<Dispute, sqlx::Error> {
        sqlx::query_as::<_, Dispute>(&format!(
            "UPDATE disputes SET is_solved = true, resolved_at = NOW()
             WHERE id = $1
             RETURNING {DISPUTE_COLUMNS}"
        ))
        .bind(dispute_id)
        .fetch_one(&self.pool)
        .await
    }
}
