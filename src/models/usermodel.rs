use chrono::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    Consumer,
    ServiceProvider,
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::SuperAdmin => "super_admin",
            UserRole::Admin => "admin",
            UserRole::Consumer => "consumer",
            UserRole::ServiceProvider => "service_provider",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub role: UserRole,
    pub picture: Option<String>,
    pub is_email_verified: bool,

    // OTP verification fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,

    // Password reset fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,

    // Moderation flags
    pub is_active: Option<bool>,
    pub is_blocked: Option<bool>,
    pub is_deleted: Option<bool>,

    // Stripe customer cached on the user row
    pub stripe_customer_id: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A user can authenticate only while the account is live.
    pub fn can_login(&self) -> bool {
        self.is_active.unwrap_or(true)
            && !self.is_blocked.unwrap_or(false)
            && !self.is_deleted.unwrap_or(false)
    }
}
