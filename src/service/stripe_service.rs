use serde::{Deserialize, Serialize};

use crate::{config::Config, service::error::ServiceError};

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StripeCustomer {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StripePaymentIntent {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub customer: Option<String>,
    pub client_secret: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StripeTransfer {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub destination: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StripeRefund {
    pub id: String,
    pub amount: i64,
    pub status: Option<String>,
    pub charge: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StripeAccount {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StripeLink {
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

/// Thin pass-through to the Stripe v1 REST API. All money movement happens
/// on Stripe's side; we only keep the returned ids.
pub struct StripeService {
    secret_key: String,
    platform_account: String,
    client: reqwest::Client,
}

impl StripeService {
    pub fn new(config: &Config) -> Self {
        Self {
            secret_key: config.stripe_secret_key.clone(),
            platform_account: config.stripe_platform_account.clone(),
            client: reqwest::Client::new(),
        }
    }

    async fn post_form<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ServiceError> {
        let response = self
            .client
            .post(format!("{STRIPE_API_BASE}{path}"))
            .header("Authorization", format!("Bearer {}", self.secret_key))
            .form(params)
            .send()
            .await
            .map_err(|e| ServiceError::Payment(e.to_string()))?;

        if !response.status().is_success() {
            let message = response
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| "Unknown Stripe error".to_string());
            return Err(ServiceError::Payment(message));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::Payment(e.to_string()))
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, ServiceError> {
        let response = self
            .client
            .get(format!("{STRIPE_API_BASE}{path}"))
            .header("Authorization", format!("Bearer {}", self.secret_key))
            .send()
            .await
            .map_err(|e| ServiceError::Payment(e.to_string()))?;

        if !response.status().is_success() {
            let message = response
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| "Unknown Stripe error".to_string());
            return Err(ServiceError::Payment(message));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::Payment(e.to_string()))
    }

    pub async fn create_customer(
        &self,
        user_id: &str,
        email: &str,
        name: &str,
    ) -> Result<StripeCustomer, ServiceError> {
        self.post_form(
            "/customers",
            &[
                ("email", email.to_string()),
                ("name", name.to_string()),
                ("metadata[userId]", user_id.to_string()),
            ],
        )
        .await
    }

    pub async fn retrieve_customer(&self, customer_id: &str) -> Result<StripeCustomer, ServiceError> {
        self.get_json(&format!("/customers/{customer_id}")).await
    }

    pub async fn attach_payment_method(
        &self,
        payment_method_id: &str,
        customer_id: &str,
    ) -> Result<(), ServiceError> {
        let _: serde_json::Value = self
            .post_form(
                &format!("/payment_methods/{payment_method_id}/attach"),
                &[("customer", customer_id.to_string())],
            )
            .await?;
        Ok(())
    }

    /// Confirmed card payment routed to the platform account.
    pub async fn create_payment_intent(
        &self,
        user_id: &str,
        customer_id: &str,
        payment_method_id: &str,
        amount_cents: i64,
        currency: &str,
    ) -> Result<StripePaymentIntent, ServiceError> {
        self.post_form(
            "/payment_intents",
            &[
                ("amount", amount_cents.to_string()),
                ("currency", currency.to_string()),
                ("customer", customer_id.to_string()),
                ("payment_method", payment_method_id.to_string()),
                ("payment_method_types[]", "card".to_string()),
                ("confirm", "true".to_string()),
                ("metadata[userId]", user_id.to_string()),
                (
                    "transfer_data[destination]",
                    self.platform_account.clone(),
                ),
            ],
        )
        .await
    }

    pub async fn create_transfer(
        &self,
        amount_cents: i64,
        currency: &str,
        destination_account_id: &str,
    ) -> Result<StripeTransfer, ServiceError> {
        self.post_form(
            "/transfers",
            &[
                ("amount", amount_cents.to_string()),
                ("currency", currency.to_string()),
                ("destination", destination_account_id.to_string()),
            ],
        )
        .await
    }

    pub async fn refund_charge(
        &self,
        charge_id: &str,
        amount_cents: Option<i64>,
    ) -> Result<StripeRefund, ServiceError> {
        let mut params = vec![("charge", charge_id.to_string())];
        if let Some(amount) = amount_cents {
            params.push(("amount", amount.to_string()));
        }
        self.post_form("/refunds", &params).await
    }

    pub async fn create_express_account(&self, user_id: &str) -> Result<StripeAccount, ServiceError> {
        self.post_form(
            "/accounts",
            &[
                ("type", "express".to_string()),
                ("country", "US".to_string()),
                ("business_type", "individual".to_string()),
                ("capabilities[card_payments][requested]", "true".to_string()),
                ("capabilities[transfers][requested]", "true".to_string()),
                ("metadata[userId]", user_id.to_string()),
            ],
        )
        .await
    }

    pub async fn create_account_link(
        &self,
        account_id: &str,
        refresh_url: &str,
        return_url: &str,
    ) -> Result<StripeLink, ServiceError> {
        self.post_form(
            "/account_links",
            &[
                ("account", account_id.to_string()),
                ("refresh_url", refresh_url.to_string()),
                ("return_url", return_url.to_string()),
                ("type", "account_onboarding".to_string()),
            ],
        )
        .await
    }

    pub async fn create_login_link(&self, account_id: &str) -> Result<StripeLink, ServiceError> {
        self.post_form(&format!("/accounts/{account_id}/login_links"), &[])
            .await
    }
}
