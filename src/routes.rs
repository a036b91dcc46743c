use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};
use serde_json::json;

use crate::{
    handler::{
        admin::admin_handler, auth::auth_handler, chat::{chat_handler, chat_ws_handler},
        consumer::consumer_handler, dispute::dispute_handler, jobs::job_handler,
        payments::{payment_handler, stripe_handler}, provider::provider_handler,
        review::review_handler, uploads::uploads_handler, users::users_handler,
    },
    middleware::{auth, role_check},
    models::usermodel::UserRole,
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest("/users", users_handler().layer(middleware::from_fn(auth)))
        .nest("/job", job_handler().layer(middleware::from_fn(auth)))
        .nest(
            "/consumer",
            consumer_handler()
                .layer(middleware::from_fn(|state, req, next| {
                    role_check(state, req, next, vec![UserRole::Consumer])
                }))
                .layer(middleware::from_fn(auth)),
        )
        .nest(
            "/service-provider",
            provider_handler().layer(middleware::from_fn(auth)),
        )
        .nest(
            "/admin",
            admin_handler()
                .layer(middleware::from_fn(|state, req, next| {
                    role_check(state, req, next, vec![UserRole::Admin, UserRole::SuperAdmin])
                }))
                .layer(middleware::from_fn(auth)),
        )
        .nest("/dispute", dispute_handler().layer(middleware::from_fn(auth)))
        .nest("/review", review_handler().layer(middleware::from_fn(auth)))
        .nest("/payments", payment_handler().layer(middleware::from_fn(auth)))
        .nest("/stripe", stripe_handler().layer(middleware::from_fn(auth)))
        .nest(
            "/chat",
            chat_handler()
                .layer(middleware::from_fn(auth))
                // The WS handshake authenticates itself from the cookie.
                .merge(chat_ws_handler()),
        )
        .nest("/uploads", uploads_handler().layer(middleware::from_fn(auth)))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state.clone()));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
        .nest_service("/uploads", ServeDir::new(app_state.env.upload_dir.clone()))
}
