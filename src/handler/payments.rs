use std::sync::Arc;

use axum::{
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::{providerdb::ProviderExt, userdb::UserExt},
    dtos::{jobdtos::ApiResponse, paymentdtos::*},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

/// Stripe customer/payment pass-through endpoints.
pub fn payment_handler() -> Router {
    Router::new()
        .route("/customer", post(make_customer))
        .route("/intent", post(create_payment_intent))
        .route("/transfer", post(create_transfer))
        .route("/refund", post(refund_charge))
}

/// Express-account onboarding for providers.
pub fn stripe_handler() -> Router {
    Router::new()
        .route("/account", post(create_express_account))
        .route("/account-link", post(create_account_link))
        .route("/login-link", get(create_login_link))
}

pub async fn make_customer(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let user = auth.user;

    let customer = if let Some(ref customer_id) = user.stripe_customer_id {
        app_state
            .stripe_service
            .retrieve_customer(customer_id)
            .await
            .map_err(HttpError::from)?
    } else {
        let customer = app_state
            .stripe_service
            .create_customer(&user.id.to_string(), &user.email, &user.name)
            .await
            .map_err(HttpError::from)?;

        app_state
            .db_client
            .set_stripe_customer_id(user.id, &customer.id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;

        customer
    };

    Ok(Json(ApiResponse::success(
        "Customer retrieved successfully",
        customer,
    )))
}

pub async fn create_payment_intent(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreatePaymentIntentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    app_state
        .stripe_service
        .attach_payment_method(&body.payment_method_id, &body.customer_id)
        .await
        .map_err(HttpError::from)?;

    let intent = app_state
        .stripe_service
        .create_payment_intent(
            &auth.user.id.to_string(),
            &body.customer_id,
            &body.payment_method_id,
            body.amount_cents,
            body.currency.as_deref().unwrap_or("usd"),
        )
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(
        "Payment intent created successfully",
        intent,
    )))
}

pub async fn create_transfer(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateTransferDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let transfer = app_state
        .stripe_service
        .create_transfer(
            body.amount_cents,
            body.currency.as_deref().unwrap_or("usd"),
            &body.destination_account_id,
        )
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(
        "Transfer created successfully",
        transfer,
    )))
}

pub async fn refund_charge(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<RefundDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let refund = app_state
        .stripe_service
        .refund_charge(&body.charge_id, body.amount_cents)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(
        "Refund created successfully",
        refund,
    )))
}

pub async fn create_express_account(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let provider = app_state
        .db_client
        .get_provider_by_user(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Service provider profile not found"))?;

    if let Some(account_id) = provider.stripe_account_id {
        return Ok(Json(ApiResponse::success(
            "Stripe account already exists",
            serde_json::json!({ "id": account_id }),
        )));
    }

    let account = app_state
        .stripe_service
        .create_express_account(&auth.user.id.to_string())
        .await
        .map_err(HttpError::from)?;

    app_state
        .db_client
        .set_provider_stripe_account(provider.id, &account.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Stripe account created successfully",
        serde_json::json!({ "id": account.id }),
    )))
}

pub async fn create_account_link(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateAccountLinkDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let provider = app_state
        .db_client
        .get_provider_by_user(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Service provider profile not found"))?;

    let account_id = provider
        .stripe_account_id
        .ok_or_else(|| HttpError::bad_request("Create a Stripe account first"))?;

    let link = app_state
        .stripe_service
        .create_account_link(&account_id, &body.refresh_url, &body.return_url)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(
        "Account link created successfully",
        link,
    )))
}

pub async fn create_login_link(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let provider = app_state
        .db_client
        .get_provider_by_user(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Service provider profile not found"))?;

    let account_id = provider
        .stripe_account_id
        .ok_or_else(|| HttpError::bad_request("Create a Stripe account first"))?;

    let link = app_state
        .stripe_service
        .create_login_link(&account_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(
        "Login link created successfully",
        link,
    )))
}
