mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod mail;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;
mod ws;

use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

use crate::db::{db::DBClient, userdb::UserExt};
use crate::service::{
    job_service::JobService, notification_service::NotificationService,
    review_service::ReviewService, stripe_service::StripeService,
};
use crate::ws::gateway::ChatGateway;

#[derive(Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    pub gateway: Arc<ChatGateway>,
    // Services
    pub job_service: Arc<JobService>,
    pub review_service: Arc<ReviewService>,
    pub notification_service: Arc<NotificationService>,
    pub stripe_service: Arc<StripeService>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client_arc = Arc::new(db_client);
        let gateway = Arc::new(ChatGateway::new());

        let notification_service = Arc::new(NotificationService::new(
            db_client_arc.clone(),
            gateway.clone(),
        ));
        let job_service = Arc::new(JobService::new(
            db_client_arc.clone(),
            notification_service.clone(),
        ));
        let review_service = Arc::new(ReviewService::new(db_client_arc.clone()));
        let stripe_service = Arc::new(StripeService::new(&config));

        Self {
            env: config,
            db_client: db_client_arc,
            gateway,
            job_service,
            review_service,
            notification_service,
            stripe_service,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = Config::init();

    let pool = match PgPoolOptions::new()
        .max_connections(20)
        .min_connections(5)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("Connection to the database is successful");
            pool
        }
        Err(err) => {
            tracing::error!("Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = sqlx::migrate!().run(&pool).await {
        tracing::error!("Failed to run database migrations: {:?}", err);
        std::process::exit(1);
    }

    let db_client = DBClient::new(pool);

    // Seed the super admin account from the environment, if configured.
    if let (Some(email), Some(password)) = (
        config.super_admin_email.clone(),
        config.super_admin_password.clone(),
    ) {
        match utils::password::hash(password) {
            Ok(hashed) => match db_client.ensure_super_admin(&email, &hashed).await {
                Ok(user) => tracing::info!("Super admin ready: {}", user.email),
                Err(e) => tracing::error!("Super admin bootstrap failed: {}", e),
            },
            Err(e) => tracing::error!("Super admin password hash failed: {}", e.to_string()),
        }
    }

    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ]);

    let app_state = Arc::new(AppState::new(db_client, config.clone()));

    let app = create_router(app_state).layer(cors);

    tracing::info!("Server is running on http://localhost:{}", config.port);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port))
        .await
        .unwrap();

    axum::serve(listener, app).await.unwrap();
}
