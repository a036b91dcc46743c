use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{disputedb::DisputeExt, jobdb::JobExt, providerdb::ProviderExt},
    dtos::{jobdtos::*, userdtos::RequestQueryDto},
    error::HttpError,
    middleware::{role_check, JWTAuthMiddeware},
    models::usermodel::UserRole,
    AppState,
};

pub fn dispute_handler() -> Router {
    Router::new()
        .route("/", post(create_dispute))
        .route("/mine", get(get_my_disputes))
        .route(
            "/",
            get(get_all_disputes).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin, UserRole::SuperAdmin])
            })),
        )
        .route(
            "/:dispute_id/resolve",
            put(resolve_dispute).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin, UserRole::SuperAdmin])
            })),
        )
}

pub async fn create_dispute(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateDisputeDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let bid = app_state
        .db_client
        .get_bid_by_id(body.bid_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Bid not found"))?;

    let provider = app_state
        .db_client
        .get_provider_by_id(bid.service_provider_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Service provider not found"))?;

    // The raiser must be a party to the bid; the other party is the accused.
    let against = if auth.user.id == bid.consumer_id {
        provider.user_id
    } else if auth.user.id == provider.user_id {
        bid.consumer_id
    } else {
        return Err(HttpError::unauthorized(
            "You are not a party to this bid",
        ));
    };

    let dispute = app_state
        .db_client
        .create_dispute(
            bid.id,
            bid.job_id,
            auth.user.id,
            against,
            body.reason,
            body.pictures.unwrap_or_default(),
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let _ = app_state
        .notification_service
        .notify_dispute_raised(&dispute)
        .await;

    Ok(Json(ApiResponse::success(
        "Dispute created successfully",
        dispute,
    )))
}

pub async fn get_my_disputes(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let disputes = app_state
        .db_client
        .get_disputes_for_user(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Disputes retrieved successfully",
        disputes,
    )))
}

pub async fn get_all_disputes(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1) as u32;
    let limit = query.limit.unwrap_or(20);

    let disputes = app_state
        .db_client
        .get_disputes(page, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Disputes retrieved successfully",
        disputes,
    )))
}

pub async fn resolve_dispute(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(dispute_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let dispute = app_state
        .db_client
        .get_dispute_by_id(dispute_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Dispute not found"))?;

    if dispute.is_solved.unwrap_or(false) {
        return Err(HttpError::bad_request("Dispute is already resolved"));
    }

    let dispute = app_state
        .db_client
        .resolve_dispute(dispute_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let _ = app_state
        .notification_service
        .notify_dispute_resolved(&dispute)
        .await;

    Ok(Json(ApiResponse::success(
        "Dispute resolved successfully",
        dispute,
    )))
}
