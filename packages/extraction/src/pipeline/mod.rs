//! Extraction pipeline - the core of the library.
//!
//! The pipeline orchestrates:
//! - Scrape (backend dispatch and normalization to markdown)
//! - Prompt building (one versioned template)
//! - Inference (single model call, traced)
//! - The service boundary tying the three together

pub mod inference;
pub mod prompts;
pub mod scrape;
pub mod service;

pub use inference::{InferenceDispatcher, INFERENCE_SPAN};
pub use prompts::{
    build_prompt, format_extraction_prompt, question_of, PreparedPrompt, DISALLOWED_TOPICS,
    EXTRACTION_PROMPT, PROMPT_VERSION, SAFETY_REFUSAL,
};
pub use scrape::{normalize, ScrapeOrchestrator, SCRAPE_SPAN};
pub use service::{remap_empty, ExtractionService, ServiceBuildError, ServiceConfig};
