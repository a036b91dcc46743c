use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::jobdb::JobExt,
    dtos::{jobdtos::*, userdtos::RequestQueryDto},
    error::HttpError,
    middleware::{role_check, JWTAuthMiddeware},
    models::usermodel::UserRole,
    AppState,
};

pub fn job_handler() -> Router {
    Router::new()
        .route(
            "/",
            post(create_job).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Consumer])
            })),
        )
        .route("/", get(get_jobs))
        .route("/:job_id", get(get_job_details))
        .route(
            "/:job_id",
            put(update_job).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Consumer])
            })),
        )
        .route(
            "/:job_id",
            delete(request_job_deletion).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Consumer])
            })),
        )
        .route("/:job_id/bids", get(get_job_bids))
}

pub async fn create_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if body.end_time <= body.start_time {
        return Err(HttpError::bad_request("End time must be after start time"));
    }

    let job = app_state
        .job_service
        .create_job(auth.user.id, body)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success("Job created successfully", job)))
}

pub async fn get_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1) as u32;
    let limit = query.limit.unwrap_or(20);

    let jobs = app_state
        .db_client
        .get_jobs(page, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Jobs retrieved successfully",
        jobs,
    )))
}

pub async fn get_job_details(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .db_client
        .get_job_by_id(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Job not found"))?;

    let bids = app_state
        .db_client
        .get_bids_for_job(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Job retrieved successfully",
        serde_json::json!({
            "job": job,
            "bids": bids,
        }),
    )))
}

pub async fn get_job_bids(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .db_client
        .get_job_by_id(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Job not found"))?;

    if job.consumer_id != auth.user.id {
        return Err(HttpError::unauthorized(
            "You are not the owner of this job",
        ));
    }

    let bids = app_state
        .db_client
        .get_bids_for_job(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Bids retrieved successfully",
        bids,
    )))
}

pub async fn update_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<UpdateJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let job = app_state
        .db_client
        .get_job_by_id(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Job not found"))?;

    if job.consumer_id != auth.user.id {
        return Err(HttpError::unauthorized(
            "You are not the owner of this job",
        ));
    }

    let updated_job = app_state
        .db_client
        .update_job(
            job_id,
            body.description,
            body.budget,
            body.start_time,
            body.end_time,
            body.tools_needed,
            body.images,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Job updated successfully",
        updated_job,
    )))
}

pub async fn request_job_deletion(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .db_client
        .get_job_by_id(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Job not found"))?;

    if job.consumer_id != auth.user.id {
        return Err(HttpError::unauthorized(
            "You are not the owner of this job",
        ));
    }

    let job = app_state
        .db_client
        .request_job_deletion(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Job removal requested to admin successfully",
        job,
    )))
}
