//! Model/provider selection and the default model catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LabelError;

/// Provider id for Google's Gemini API.
pub const GOOGLE_GENAI: &str = "google_genai";

/// Provider id for NVIDIA NIM.
pub const NVIDIA: &str = "nvidia";

/// Labels offered in the model dropdown.
pub const MODEL_CATALOG: [&str; 6] = [
    "gemini-2.5-flash-lite (google_genai)",
    "gemini-2.5-pro (google_genai)",
    "gemini-2.5-flash (google_genai)",
    "bytedance/seed-oss-36b-instruct (nvidia)",
    "deepseek-ai/deepseek-v3.1 (nvidia)",
    "qwen/qwen3-next-80b-a3b-instruct (nvidia)",
];

/// Label selected by default.
pub const DEFAULT_MODEL_LABEL: &str = MODEL_CATALOG[0];

/// A (model name, provider id) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelSelection {
    pub model: String,
    pub provider: String,
}

impl ModelSelection {
    pub fn new(model: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            provider: provider.into(),
        }
    }

    /// Render back to the "model (provider)" label form.
    pub fn label(&self) -> String {
        format!("{} ({})", self.model, self.provider)
    }
}

impl fmt::Display for ModelSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.model, self.provider)
    }
}

impl FromStr for ModelSelection {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_model_provider(s)
    }
}

/// Parse a "model (provider)" label.
///
/// Splits on the first `" ("`. Everything before it is the model, everything
/// after it up to a trailing `)` is the provider; both are trimmed and must be
/// non-empty.
pub fn parse_model_provider(label: &str) -> Result<ModelSelection, LabelError> {
    let invalid = || LabelError::InvalidFormat {
        label: label.to_string(),
    };

    let (model, rest) = label.split_once(" (").ok_or_else(invalid)?;
    let provider = rest.trim_end().strip_suffix(')').ok_or_else(invalid)?;

    let model = model.trim();
    let provider = provider.trim();
    if model.is_empty() || provider.is_empty() || provider.contains(['(', ')']) {
        return Err(invalid());
    }

    Ok(ModelSelection::new(model, provider))
}
