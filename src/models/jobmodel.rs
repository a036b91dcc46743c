use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "bid_status", rename_all = "snake_case")]
pub enum BidStatus {
    Pending,
    Accepted,
}

impl BidStatus {
    pub fn to_str(&self) -> &str {
        match self {
            BidStatus::Pending => "pending",
            BidStatus::Accepted => "accepted",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct ServiceProvider {
    pub id: Uuid,
    pub user_id: Uuid,
    pub address: String,
    pub documents: Option<String>,
    pub is_profile_completed: Option<bool>,
    pub is_verified_from_admin: Option<bool>,
    pub stripe_account_id: Option<String>,
    // Running mean over all reviews, together with how many fed into it.
    pub current_rating: Option<f64>,
    pub rating_count: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: Uuid,
    pub consumer_id: Uuid,
    pub category_id: Uuid,
    pub sub_service_id: Uuid,
    pub area_id: Uuid,
    pub description: String,
    pub budget: BigDecimal,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub tools_needed: Option<bool>,
    pub images: Option<Vec<String>>,
    pub assigned_service_provider_id: Option<Uuid>,
    pub is_complete_from_consumer: Option<bool>,
    pub is_completed_from_service_provider: Option<bool>,
    pub is_delete_request_to_admin: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Done only when both sides have flagged completion.
    pub fn is_done(&self) -> bool {
        self.is_complete_from_consumer.unwrap_or(false)
            && self.is_completed_from_service_provider.unwrap_or(false)
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Bid {
    pub id: Uuid,
    pub job_id: Uuid,
    pub service_provider_id: Uuid,
    pub consumer_id: Uuid,
    pub price: BigDecimal,
    pub proposal: String,
    pub status: Option<BidStatus>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Review {
    pub id: Uuid,
    pub job_id: Uuid,
    pub reviewer_id: Uuid,
    pub service_provider_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Dispute {
    pub id: Uuid,
    pub bid_id: Uuid,
    pub job_id: Uuid,
    pub raised_by: Uuid,
    pub against: Uuid,
    pub reason: String,
    pub pictures: Option<Vec<String>>,
    pub is_solved: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
}

// Admin-managed catalog the jobs reference.

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Area {
    pub id: Uuid,
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct ServiceCategory {
    pub id: Uuid,
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct SubService {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
}
