//! Application setup and server configuration.

use std::time::Duration;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{
    cancel_job_handler, extract_handler, health_handler, job_status_handler, options_handler,
    scrape_handler,
};
use crate::server::static_files::serve_web_app;

/// Handlers only enqueue work, so requests themselves stay short.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the Axum application router
pub fn build_app(deps: ServerDeps) -> Router {
    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    let api = Router::new()
        .route("/options", get(options_handler))
        .route("/scrape", post(scrape_handler))
        .route("/extract", post(extract_handler))
        .route(
            "/jobs/:id",
            get(job_status_handler).delete(cancel_job_handler),
        );

    Router::new()
        .nest("/api", api)
        // Health check
        .route("/health", get(health_handler))
        // Web UI (everything else)
        .fallback(serve_web_app)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(deps))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
