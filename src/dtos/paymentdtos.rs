use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreatePaymentIntentDto {
    #[validate(length(min = 1, message = "Customer id is required"))]
    pub customer_id: String,

    #[validate(length(min = 1, message = "Payment method id is required"))]
    pub payment_method_id: String,

    #[validate(range(min = 1, message = "Amount must be at least one cent"))]
    pub amount_cents: i64,

    pub currency: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateTransferDto {
    #[validate(range(min = 1, message = "Amount must be at least one cent"))]
    pub amount_cents: i64,

    pub currency: Option<String>,

    #[validate(length(min = 1, message = "Destination account id is required"))]
    pub destination_account_id: String,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RefundDto {
    #[validate(length(min = 1, message = "Charge id is required"))]
    pub charge_id: String,

    pub amount_cents: Option<i64>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateAccountLinkDto {
    #[validate(url(message = "Refresh URL must be a valid URL"))]
    pub refresh_url: String,

    #[validate(url(message = "Return URL must be a valid URL"))]
    pub return_url: String,
}
