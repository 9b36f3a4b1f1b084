//! CourseHub API server entry point.

use std::sync::{Arc, Mutex};

use coursehub_api::config::ApiConfig;
use coursehub_api::error::AppError;
use coursehub_api::routes;
use coursehub_api::state::AppState;
use coursehub_api::telemetry;
use coursehub_core::clock::SystemClock;
use coursehub_core::rng::SystemRng;
use coursehub_store::pg_category_repository::PgCategoryRepository;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Read configuration from environment.
    let config = ApiConfig::from_env()?;

    // Initialize tracing subscriber.
    let _telemetry = telemetry::init(env!("CARGO_PKG_NAME"), config.otlp_endpoint.as_deref())?;

    tracing::info!("Starting CourseHub API server");

    // Create database connection pool and bring the schema up to date.
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;

    // Build application state.
    let app_state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(Mutex::new(SystemRng::from_os())),
        Arc::new(PgCategoryRepository::new(pool)),
    );

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = routes::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server.
    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("CourseHub API server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
