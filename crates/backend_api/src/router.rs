use axum::{routing::get, Router};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{handlers, repository::FinanceRepository};

/// Create the main application router with all API endpoints
pub fn create_router(repo: Arc<dyn FinanceRepository>, static_dir: Option<PathBuf>) -> Router {
    // Create CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Data endpoints: GET for parameterless queries, POST with a JSON body otherwise
        .route(
            "/data/:resource",
            get(handlers::get_resource).post(handlers::post_resource),
        )
        .with_state(repo);

    // Frontend bundle
    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.layer(cors).layer(TraceLayer::new_for_http())
}
