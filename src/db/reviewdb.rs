use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::jobmodel::{Review, ServiceProvider};
use crate::service::review_service::next_rating;

#[async_trait]
pub trait ReviewExt {
    /// Insert the review and fold it into the provider's running mean.
    ///
    /// The provider row is locked for the duration of the transaction so two
    /// concurrent submissions cannot both read the same old aggregate.
    async fn create_review(
        &self,
        job_id: Uuid,
        reviewer_id: Uuid,
        service_provider_id: Uuid,
        rating: i32,
        comment: Option<String>,
    ) -> Result<(Review, ServiceProvider), sqlx::Error>;

    async fn get_reviews(&self) -> Result<Vec<Review>, sqlx::Error>;

    async fn get_reviews_for_provider(
        &self,
        service_provider_id: Uuid,
    ) -> Result<Vec<Review>, sqlx::Error>;
}

#[async_trait]
impl ReviewExt for DBClient {
    async fn create_review(
        &self,
        job_id: Uuid,
        reviewer_id: Uuid,
        service_provider_id: Uuid,
        rating: i32,
        comment: Option<String>,
    ) -> Result<(Review, ServiceProvider), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let (current_rating, rating_count) = sqlx::query_as::<_, (Option<f64>, Option<i32>)>(
            "SELECT current_rating, rating_count FROM service_providers
             WHERE id = $1
             FOR UPDATE",
        )
        .bind(service_provider_id)
        .fetch_one(&mut *tx)
        .await?;

        let review = sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (job_id, reviewer_id, service_provider_id, rating, comment)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, job_id, reviewer_id, service_provider_id, rating, comment, created_at",
        )
        .bind(job_id)
        .bind(reviewer_id)
        .bind(service_provider_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(&mut *tx)
        .await?;

        let (new_rating, new_count) = next_rating(
            current_rating.unwrap_or(0.0),
            rating_count.unwrap_or(0),
            rating,
        );

        let provider = sqlx::query_as::<_, ServiceProvider>(
            "UPDATE service_providers
             SET current_rating = $2, rating_count = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING id, user_id, address, documents, is_profile_completed,
                       is_verified_from_admin, stripe_account_id, current_rating,
                       rating_count, created_at, updated_at",
        )
        .bind(service_provider_id)
        .bind(new_rating)
        .bind(new_count)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((review, provider))
    }

    async fn get_reviews(&self) -> Result<Vec<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            "SELECT id, job_id, reviewer_id, service_provider_id, rating, comment, created_at
             FROM reviews
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn get_reviews_for_provider(
        &self,
        service_provider_id: Uuid,
    ) -> Result<Vec<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            "SELECT id, job_id, reviewer_id, service_provider_id, rating, comment, created_at
             FROM reviews
             WHERE service_provider_id = $1
             ORDER BY created_at DESC",
        )
        .bind(service_provider_id)
        .fetch_all(&self.pool)
        .await
    }
}
