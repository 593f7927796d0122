use axum::{extract::Extension, http::StatusCode, Json};
use extraction::Tracer;
use serde::Serialize;

use crate::kernel::ServerDeps;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    scrapers: Vec<String>,
    providers: Vec<String>,
    tracing: bool,
    jobs: usize,
}

/// Health check endpoint
///
/// Reports registered scrapers, routable providers, whether tracing is on
/// and how many jobs are tracked. Nothing here calls out to a backend, so
/// it is always 200 once the server is up.
pub async fn health_handler(
    Extension(deps): Extension<ServerDeps>,
) -> (StatusCode, Json<HealthResponse>) {
    let scrapers = deps
        .service
        .backends()
        .into_iter()
        .map(|b| b.id().to_string())
        .collect();

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            scrapers,
            providers: deps.service.providers(),
            tracing: deps.tracer.is_enabled(),
            jobs: deps.jobs.len().await,
        }),
    )
}
