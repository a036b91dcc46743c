use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, patch, post, put},
    Extension, Json, Router,
};
use num_traits::ToPrimitive;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{catalogdb::CatalogExt, jobdb::JobExt, providerdb::ProviderExt},
    dtos::{jobdtos::*, userdtos::RequestQueryDto},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

/// Provider-side workflow: profile completion, bidding, and flagging work
/// complete.
pub fn provider_handler() -> Router {
    Router::new()
        .route("/profile", post(complete_profile))
        .route("/me", get(current_provider))
        .route("/documents", patch(upload_documents))
        .route("/", get(get_providers))
        .route("/bids", get(my_bids))
        .route("/bids/accepted", get(my_accepted_bids))
        .route("/jobs/:job_id/bid", post(make_bid))
        .route("/jobs/:job_id/complete", put(work_complete))
}

pub async fn complete_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CompleteProviderProfileDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    tracing::info!("Creating service provider profile for user: {}", auth.user.id);

    let provider = app_state
        .db_client
        .get_provider_by_user(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Service provider not found"))?;

    // Every referenced area and category must exist.
    for area_id in &body.service_areas {
        app_state
            .db_client
            .get_area_by_id(*area_id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?
            .ok_or_else(|| HttpError::not_found("One or more service areas are invalid"))?;
    }
    for category_id in &body.service_categories {
        app_state
            .db_client
            .get_service_category_by_id(*category_id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?
            .ok_or_else(|| HttpError::not_found("One or more service categories are invalid"))?;
    }

    let provider = app_state
        .db_client
        .complete_provider_profile(
            provider.id,
            body.address,
            body.service_areas,
            body.service_categories,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Service provider profile created successfully",
        provider,
    )))
}

pub async fn current_provider(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let provider = app_state
        .db_client
        .get_provider_by_user(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Service provider not found"))?;

    Ok(Json(ApiResponse::success(
        "Current service provider retrieved successfully",
        provider,
    )))
}

pub async fn upload_documents(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<UploadDocumentsDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let provider = app_state
        .db_client
        .get_provider_by_user(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Invalid service provider"))?;

    let provider = app_state
        .db_client
        .update_provider_documents(provider.id, body.documents)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Documents uploaded successfully",
        provider,
    )))
}

pub async fn get_providers(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1) as u32;
    let limit = query.limit.unwrap_or(20);

    let providers = app_state
        .db_client
        .get_providers(page, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Service providers retrieved successfully",
        providers,
    )))
}

pub async fn make_bid(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<PlaceBidDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let bid = app_state
        .job_service
        .place_bid(
            auth.user.id,
            job_id,
            body.price,
            body.proposal.unwrap_or_default(),
        )
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success("Bid placed successfully", bid)))
}

pub async fn my_bids(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let provider = app_state
        .db_client
        .get_provider_by_user(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Invalid service provider"))?;

    let bids = app_state
        .db_client
        .get_bids_by_provider(provider.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Bids retrieved successfully",
        bids,
    )))
}

pub async fn my_accepted_bids(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let provider = app_state
        .db_client
        .get_provider_by_user(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Invalid service provider"))?;

    let bids = app_state
        .db_client
        .get_completed_accepted_bids_by_provider(provider.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total_earned: f64 = bids
        .iter()
        .filter_map(|bid| bid.price.to_f64())
        .sum();

    Ok(Json(ApiResponse::success(
        "Accepted bids retrieved successfully",
        serde_json::json!({
            "bids": bids,
            "total_earned": total_earned,
        }),
    )))
}

pub async fn work_complete(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .job_service
        .complete_from_provider(auth.user.id, job_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(
        "Service marked as completed from service provider, and waiting for consumer confirmation",
        job,
    )))
}
