use axum::Json;
use serde::Serialize;

use extraction::{ScraperBackend, DEFAULT_MODEL_LABEL, MODEL_CATALOG};

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub scrapers: Vec<&'static str>,
    pub default_scraper: &'static str,
    pub models: Vec<&'static str>,
    pub default_model: &'static str,
}

/// Choices for the UI dropdowns.
pub async fn options_handler() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        scrapers: ScraperBackend::ALL.iter().map(|b| b.label()).collect(),
        default_scraper: ScraperBackend::default().label(),
        models: MODEL_CATALOG.to_vec(),
        default_model: DEFAULT_MODEL_LABEL,
    })
}
