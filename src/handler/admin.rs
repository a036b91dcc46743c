use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{catalogdb::CatalogExt, jobdb::JobExt, providerdb::ProviderExt, userdb::UserExt},
    dtos::{jobdtos::*, userdtos::FilterUserDto},
    error::HttpError,
    models::usermodel::UserRole,
    AppState,
};

/// Admin surface: moderation, provider verification, job deletion approval,
/// and the catalog reference data. Role checks are layered in routes.rs.
pub fn admin_handler() -> Router {
    Router::new()
        .route("/users", get(get_all_users))
        .route("/users/:user_id/verify-provider", put(verify_service_provider))
        .route("/users/:user_id/block", put(toggle_block_user))
        .route("/users/:user_id", delete(delete_user))
        .route("/jobs/:job_id", delete(delete_job))
        .route("/catalog/areas", post(create_area))
        .route("/catalog/services", post(create_service_category))
        .route("/catalog/sub-services", post(create_sub_service))
        .route("/catalog", get(get_catalog))
}

pub async fn get_all_users(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let users = app_state
        .db_client
        .get_users(1, 100)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let filtered: Vec<FilterUserDto> = users.iter().map(FilterUserDto::filter_user).collect();

    Ok(Json(ApiResponse::success(
        "All users fetched successfully",
        filtered,
    )))
}

pub async fn verify_service_provider(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state
        .db_client
        .get_user(Some(user_id), None, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("User does not exist"))?;

    if user.role != UserRole::ServiceProvider {
        return Err(HttpError::bad_request("User is not a service provider"));
    }
    if user.is_deleted.unwrap_or(false) {
        return Err(HttpError::unauthorized("User account is already deleted"));
    }
    if user.is_blocked.unwrap_or(false) {
        return Err(HttpError::unauthorized("User account is already blocked"));
    }
    if !user.is_active.unwrap_or(true) {
        return Err(HttpError::unauthorized("User account is not active"));
    }

    let provider = app_state
        .db_client
        .get_provider_by_user(user_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Service provider profile not found"))?;

    if provider.is_verified_from_admin.unwrap_or(false) {
        return Err(HttpError::unauthorized("User is already verified"));
    }

    let provider = app_state
        .db_client
        .set_provider_verified(provider.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    tracing::info!(user_id = %user_id, "Service provider verified by admin");

    Ok(Json(ApiResponse::success(
        "User is verified successfully",
        provider,
    )))
}

pub async fn toggle_block_user(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state
        .db_client
        .get_user(Some(user_id), None, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("User does not exist"))?;

    if user.is_deleted.unwrap_or(false) {
        return Err(HttpError::unauthorized("User account is already deleted"));
    }

    let blocked = !user.is_blocked.unwrap_or(false);
    let user = app_state
        .db_client
        .set_user_blocked(user_id, blocked)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let message = if blocked {
        "User is blocked successfully"
    } else {
        "User is unblocked successfully"
    };

    Ok(Json(ApiResponse::success(
        message,
        FilterUserDto::filter_user(&user),
    )))
}

pub async fn delete_user(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state
        .db_client
        .get_user(Some(user_id), None, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("User does not exist"))?;

    let user = app_state
        .db_client
        .soft_delete_user(user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "User account is deleted successfully",
        FilterUserDto::filter_user(&user),
    )))
}

pub async fn delete_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .db_client
        .get_job_by_id(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Job does not exist"))?;

    // Admins only act on jobs the consumer has asked to remove.
    if !job.is_delete_request_to_admin.unwrap_or(false) {
        return Err(HttpError::unauthorized(
            "Job deletion request is not sent to admin",
        ));
    }

    app_state
        .db_client
        .delete_job(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success("Job is deleted successfully", job)))
}

pub async fn create_area(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateAreaDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let existing = app_state
        .db_client
        .get_area_by_name(&body.area)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;
    if existing.is_some() {
        return Err(HttpError::bad_request("Area already exists"));
    }

    let area = app_state
        .db_client
        .create_area(&body.area)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success("Area created successfully", area)))
}

pub async fn create_service_category(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateServiceCategoryDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let existing = app_state
        .db_client
        .get_service_category_by_name(&body.name)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;
    if existing.is_some() {
        return Err(HttpError::bad_request("Service already exists"));
    }

    let category = app_state
        .db_client
        .create_service_category(&body.name)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Service created successfully",
        category,
    )))
}

pub async fn create_sub_service(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateSubServiceDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let category = app_state
        .db_client
        .get_service_category_by_id(body.category_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Service does not exist"))?;

    let sub_service = app_state
        .db_client
        .create_sub_service(category.id, &body.name)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Sub-service created successfully",
        sub_service,
    )))
}

pub async fn get_catalog(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let areas = app_state
        .db_client
        .get_areas()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let services = app_state
        .db_client
        .get_service_categories()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Area and Services fetched successfully",
        serde_json::json!({
            "areas": areas,
            "services": services,
        }),
    )))
}
