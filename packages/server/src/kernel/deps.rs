//! Server dependencies, built once at startup from [`Config`].

use anyhow::{Context, Result};
use std::sync::Arc;

use extraction::{build_tracer, ExtractionService, NoopTracer, Tracer};

use crate::config::Config;
use crate::kernel::job_tracker::JobTracker;

/// Shared dependencies for the HTTP handlers.
#[derive(Clone)]
pub struct ServerDeps {
    pub service: ExtractionService,
    pub jobs: JobTracker,
    /// Same tracer the service reports to; flushed on shutdown
    pub tracer: Arc<dyn Tracer>,
}

impl ServerDeps {
    pub fn new(service: ExtractionService, jobs: JobTracker) -> Self {
        Self {
            service,
            jobs,
            tracer: Arc::new(NoopTracer),
        }
    }

    pub fn with_tracer(mut self, tracer: Arc<dyn Tracer>) -> Self {
        self.tracer = tracer;
        self
    }

    /// Build the production dependencies: HTTP scrapers, provider router and
    /// the Langfuse tracer when configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let tracer = build_tracer(config.langfuse.clone());
        let service = create_extraction_service(config, tracer.clone())?;

        Ok(Self::new(service, JobTracker::new()).with_tracer(tracer))
    }
}

/// Build the extraction service from configuration.
pub fn create_extraction_service(
    config: &Config,
    tracer: Arc<dyn Tracer>,
) -> Result<ExtractionService> {
    ExtractionService::from_config(&config.service_config(), tracer)
        .context("Failed to create extraction service")
}
