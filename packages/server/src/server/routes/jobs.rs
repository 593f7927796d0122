//! Scrape and extract endpoints.
//!
//! POST /api/scrape   {url, scraper}              -> 202 + in-progress job
//! POST /api/extract  {query, source_text, model} -> 202 + in-progress job
//! GET    /api/jobs/:id                           -> current job status
//! DELETE /api/jobs/:id                           -> cancel
//!
//! Input problems (bad selector, malformed label, empty URL) are not HTTP
//! errors: they come back as a failed job, exactly like a backend failure.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use extraction::{
    ScraperBackend, DEFAULT_MODEL_LABEL, GENERATING_IN_PROGRESS, SCRAPING_IN_PROGRESS,
};

use crate::kernel::{JobKind, JobView, ServerDeps};

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_scraper")]
    pub scraper: String,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub source_text: String,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_scraper() -> String {
    ScraperBackend::default().label().to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL_LABEL.to_string()
}

pub async fn scrape_handler(
    Extension(deps): Extension<ServerDeps>,
    Json(request): Json<ScrapeRequest>,
) -> (StatusCode, Json<JobView>) {
    let service = deps.service.clone();
    let job = deps
        .jobs
        .spawn(JobKind::Scrape, SCRAPING_IN_PROGRESS, async move {
            service.scrape(&request.url, &request.scraper).await
        })
        .await;

    (StatusCode::ACCEPTED, Json(job))
}

pub async fn extract_handler(
    Extension(deps): Extension<ServerDeps>,
    Json(request): Json<ExtractRequest>,
) -> (StatusCode, Json<JobView>) {
    let service = deps.service.clone();
    let job = deps
        .jobs
        .spawn(JobKind::Extract, GENERATING_IN_PROGRESS, async move {
            service
                .extract(&request.query, &request.source_text, &request.model)
                .await
        })
        .await;

    (StatusCode::ACCEPTED, Json(job))
}

pub async fn job_status_handler(
    Extension(deps): Extension<ServerDeps>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobView>, StatusCode> {
    deps.jobs.get(id).await.map(Json).ok_or(StatusCode::NOT_FOUND)
}

pub async fn cancel_job_handler(
    Extension(deps): Extension<ServerDeps>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobView>, StatusCode> {
    deps.jobs.cancel(id).await.map(Json).ok_or(StatusCode::NOT_FOUND)
}
