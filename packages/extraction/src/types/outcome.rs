//! Request outcomes and the user-facing messages that go with them.
//!
//! Internally every operation returns an explicit [`Outcome`]. Only the
//! display adapter ([`Outcome::display`]) folds a failure back into the
//! marker-prefixed string the interface renders inline.

use serde::{Deserialize, Serialize};

/// Prefix that marks a failure in rendered output.
pub const FAILURE_MARKER: &str = "❌";

/// Returned without a model call when there is nothing to extract from, and
/// the literal the model is told to answer with when it finds nothing.
pub const NO_RELEVANT_INFORMATION: &str = "No relevant information found to answer your question.";

/// Shown when the model produced an empty or whitespace-only answer.
pub const NO_INFORMATION_EXTRACTED: &str = "No information could be extracted from the scraped content. Please check your query or try a different model/provider.";

/// Interim status while a scrape is running.
pub const SCRAPING_IN_PROGRESS: &str = "⏳ Scraping website... Please wait.";

/// Interim status while the model is generating.
pub const GENERATING_IN_PROGRESS: &str = "⏳ Generating response... Please wait.";

/// Terminal result of a scrape or extraction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success { text: String },
    Failure { message: String },
}

/// Result of a scrape: markdown on success.
pub type ScrapeOutcome = Outcome;

/// Result of an extraction: model text on success.
pub type ExtractionOutcome = Outcome;

impl Outcome {
    pub fn success(text: impl Into<String>) -> Self {
        Outcome::Success { text: text.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Outcome::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Success payload, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Outcome::Success { text } => Some(text),
            Outcome::Failure { .. } => None,
        }
    }

    /// Failure message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { message } => Some(message),
        }
    }

    /// Render for display: success text verbatim, failures with the marker.
    pub fn display(&self) -> String {
        match self {
            Outcome::Success { text } => text.clone(),
            Outcome::Failure { message } => render_failure(message),
        }
    }
}

/// Wrap a failure message in the marker convention.
pub fn render_failure(message: &str) -> String {
    format!("{} <span style='color:red;'>{}</span>", FAILURE_MARKER, message)
}
