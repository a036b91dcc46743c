use std::sync::Arc;

use axum::{
    extract::Multipart, response::IntoResponse, routing::post, Extension, Json, Router,
};
use uuid::Uuid;

use crate::{dtos::jobdtos::ApiResponse, error::HttpError, AppState};

pub fn uploads_handler() -> Router {
    Router::new().route("/", post(upload_files))
}

/// Store uploaded files under the configured directory and hand back public
/// URLs built from the app's domain. Clients attach the returned URLs to
/// jobs, disputes, documents, or chat messages.
pub async fn upload_files(
    Extension(app_state): Extension<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpError> {
    let upload_dir = std::path::Path::new(&app_state.env.upload_dir);
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let mut urls = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HttpError::bad_request(e.to_string()))?
    {
        let original_name = field.file_name().unwrap_or("file").to_string();

        // Keep the extension, replace the name, so uploads cannot collide or
        // escape the upload directory.
        let extension = std::path::Path::new(&original_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let stored_name = format!("{}.{}", Uuid::new_v4(), extension);

        let data = field
            .bytes()
            .await
            .map_err(|e| HttpError::bad_request(e.to_string()))?;

        if data.is_empty() {
            return Err(HttpError::bad_request("Uploaded file is empty"));
        }

        tokio::fs::write(upload_dir.join(&stored_name), &data)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;

        tracing::info!(
            "Stored upload {} ({} bytes) as {}",
            original_name,
            data.len(),
            stored_name
        );

        urls.push(format!("{}/uploads/{}", app_state.env.app_url, stored_name));
    }

    if urls.is_empty() {
        return Err(HttpError::bad_request("No files provided"));
    }

    Ok(Json(ApiResponse::success(
        "Files uploaded successfully",
        serde_json::json!({ "urls": urls }),
    )))
}
