// Main entry point for the web server

use anyhow::{Context, Result};
use extraction::Tracer;
use scraper_server::{kernel::ServerDeps, server::build_app, Config};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,extraction=debug,scraper_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting LLM Web Scraper");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        firecrawl = config.scrapers.firecrawl_api_key.is_some(),
        crawl4ai = %config.scrapers.crawl4ai_base_url,
        google_genai = config.google_api_key.is_some(),
        nvidia = config.nvidia_api_key.is_some(),
        "Configuration loaded"
    );

    // Build dependencies and application
    let deps = ServerDeps::from_config(&config)?;
    deps.jobs.start_pruning(Duration::from_secs(60));
    let tracer = deps.tracer.clone();
    let app = build_app(deps);

    // Start server
    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Web UI: http://localhost:{}/", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracer.flush().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
