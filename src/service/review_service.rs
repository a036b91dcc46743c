use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, jobdb::JobExt, providerdb::ProviderExt, reviewdb::ReviewExt, userdb::UserExt},
    models::jobmodel::{Review, ServiceProvider},
    service::error::ServiceError,
};

/// Recompute the running mean as `(sum + new) / (count + 1)`.
pub fn next_rating(current_rating: f64, rating_count: i32, new_rating: i32) -> (f64, i32) {
    let total = current_rating * rating_count as f64 + new_rating as f64;
    let new_count = rating_count + 1;
    (total / new_count as f64, new_count)
}

/// A user cannot rate their own provider profile.
pub fn ensure_not_self_review(
    reviewer_id: Uuid,
    provider_user_id: Uuid,
) -> Result<(), ServiceError> {
    if reviewer_id == provider_user_id {
        return Err(ServiceError::Validation(
            "You cannot review yourself".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct ReviewService {
    db_client: Arc<DBClient>,
}

impl ReviewService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn create_review(
        &self,
        reviewer_id: Uuid,
        service_provider_id: Uuid,
        job_id: Uuid,
        rating: i32,
        comment: Option<String>,
    ) -> Result<(Review, ServiceProvider), ServiceError> {
        let reviewer = self
            .db_client
            .get_user(Some(reviewer_id), None, None)
            .await?
            .ok_or(ServiceError::UserNotFound(reviewer_id))?;

        let provider = self
            .db_client
            .get_provider_by_id(service_provider_id)
            .await?
            .ok_or_else(|| {
                ServiceError::Validation("Invalid service provider ID".to_string())
            })?;

        ensure_not_self_review(reviewer.id, provider.user_id)?;

        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if job.consumer_id != reviewer.id {
            return Err(ServiceError::UnauthorizedJobAccess(reviewer.id, job.id));
        }

        let (review, provider) = self
            .db_client
            .create_review(job_id, reviewer_id, service_provider_id, rating, comment)
            .await?;

        tracing::info!(
            review_id = %review.id,
            provider_id = %service_provider_id,
            rating = review.rating,
            new_mean = provider.current_rating.unwrap_or(0.0),
            "Review created successfully"
        );

        Ok((review, provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_review_sets_the_mean() {
        let (rating, count) = next_rating(0.0, 0, 4);
        assert_eq!(rating, 4.0);
        assert_eq!(count, 1);
    }

    #[test]
    fn mean_is_correct_over_sequential_reviews() {
        let ratings = [5, 3, 4, 2, 5];
        let mut mean = 0.0;
        let mut count = 0;

        for r in ratings {
            let (m, c) = next_rating(mean, count, r);
            mean = m;
            count = c;
        }

        let expected = ratings.iter().sum::<i32>() as f64 / ratings.len() as f64;
        assert_eq!(count, ratings.len() as i32);
        assert!((mean - expected).abs() < 1e-9);
    }

    #[test]
    fn single_additional_review_moves_the_mean() {
        // 4.0 over 2 reviews, then a 1: (8 + 1) / 3 = 3.0
        let (rating, count) = next_rating(4.0, 2, 1);
        assert_eq!(rating, 3.0);
        assert_eq!(count, 3);
    }

    #[test]
    fn reviewing_yourself_is_rejected() {
        let user = Uuid::new_v4();
        assert!(ensure_not_self_review(user, user).is_err());
        assert!(ensure_not_self_review(user, Uuid::new_v4()).is_ok());
    }
}
