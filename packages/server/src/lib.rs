// LLM Web Scraper - server and CLI
//
// Web UI, JSON API and command line front ends over the extraction library.
// Every request is accepted immediately as a job and finishes with exactly
// one success or failure outcome.

pub mod config;
pub mod kernel;
pub mod server;

pub use config::*;
