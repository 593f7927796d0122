//! Core trait abstractions for the extraction library.
//!
//! These traits are the seams to the external collaborators: scraping
//! backends, model providers and the tracing service.

pub mod ai;
pub mod scraper;
pub mod tracer;
