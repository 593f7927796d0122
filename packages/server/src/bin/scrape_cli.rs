//! Command line front end: scrape a page, extract from markdown, or both.
//!
//! Uses the same configuration as the server. Results are printed to stdout;
//! failures go to stderr in red and the process exits with status 1.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use extraction::{
    build_tracer, Outcome, ScraperBackend, Tracer, DEFAULT_MODEL_LABEL, FAILURE_MARKER,
};
use scraper_server::{kernel::create_extraction_service, Config};

#[derive(Parser)]
#[command(name = "scrape-cli")]
#[command(about = "Scrape web pages and extract information with an LLM")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape a URL and print its markdown
    Scrape {
        #[arg(long)]
        url: String,
        /// "Scrape with Crawl4AI", "Scrape with FireCrawl", "crawl4ai" or "firecrawl"
        #[arg(long, default_value_t = ScraperBackend::default().label().to_string())]
        scraper: String,
    },

    /// Answer a question about a markdown file
    Extract {
        #[arg(long)]
        query: String,
        #[arg(long)]
        source_file: PathBuf,
        /// "model (provider)" label
        #[arg(long, default_value = DEFAULT_MODEL_LABEL)]
        model: String,
    },

    /// Scrape a URL, then answer a question about it
    Run {
        #[arg(long)]
        url: String,
        #[arg(long)]
        query: String,
        #[arg(long, default_value_t = ScraperBackend::default().label().to_string())]
        scraper: String,
        #[arg(long, default_value = DEFAULT_MODEL_LABEL)]
        model: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    let tracer = build_tracer(config.langfuse.clone());
    let service = create_extraction_service(&config, tracer.clone())?;

    let outcome = match cli.command {
        Commands::Scrape { url, scraper } => service.scrape(&url, &scraper).await,
        Commands::Extract {
            query,
            source_file,
            model,
        } => {
            let source_text = std::fs::read_to_string(&source_file)
                .with_context(|| format!("Failed to read {}", source_file.display()))?;
            service.extract(&query, &source_text, &model).await
        }
        Commands::Run {
            url,
            query,
            scraper,
            model,
        } => {
            let scraped = service.scrape(&url, &scraper).await;
            match scraped.text() {
                Some(markdown) => service.extract(&query, markdown, &model).await,
                None => scraped,
            }
        }
    };

    tracer.flush().await;

    Ok(print_outcome(&outcome))
}

fn print_outcome(outcome: &Outcome) -> ExitCode {
    match outcome {
        Outcome::Success { text } => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Outcome::Failure { message } => {
            eprintln!("{}", format!("{} {}", FAILURE_MARKER, message).red());
            ExitCode::FAILURE
        }
    }
}
